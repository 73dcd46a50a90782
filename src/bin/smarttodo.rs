//! Command-line front end for the SmartTodo task store.
//!
//! Usage:
//!
//! ```text
//! smarttodo [--backend json|postgres] [--data-dir DIR] <command>
//! ```
//!
//! Commands are `list`, `add <description> [--due YYYY-MM-DD]`,
//! `toggle <id>`, `delete <id>`, `clear`, and `stats`. Failures print
//! `error [<class>]: <message>` to stderr, where the class is `validation`,
//! `not_found`, or `persistence`; an id that no task can carry (such as 0)
//! is reported as `not_found`.
//!
//! Every option can also be supplied through its `SMARTTODO_*` environment
//! variable; the `PostgreSQL` backend reads `DATABASE_URL`.

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use smarttodo::task::{
    adapters::{
        json::{DEFAULT_SLOT, JsonFileTaskRepository},
        postgres::PostgresTaskRepository,
    },
    domain::{Task, TaskId, TaskSummary},
    ports::TaskRepository,
    services::{
        CreateTaskRequest, TaskStore, TaskStoreConfig, TaskStoreError, TaskStoreErrorKind,
    },
};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "smarttodo", version, about = "Minimal task tracker")]
struct Cli {
    /// Storage backend.
    #[arg(long, value_enum, env = "SMARTTODO_BACKEND", default_value_t = Backend::Json)]
    backend: Backend,

    /// Directory holding the JSON slot.
    #[arg(long, env = "SMARTTODO_DATA_DIR", default_value = ".")]
    data_dir: Utf8PathBuf,

    /// File name of the JSON slot.
    #[arg(long, env = "SMARTTODO_SLOT", default_value = DEFAULT_SLOT)]
    slot: String,

    /// Connection URL for the `PostgreSQL` backend.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum description length in characters.
    #[arg(long, env = "SMARTTODO_MAX_DESCRIPTION_CHARS")]
    max_description_chars: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Json,
    Postgres,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tasks, newest first.
    List,
    /// Add a task.
    Add {
        /// Task description.
        description: String,
        /// Due date in `YYYY-MM-DD` form.
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Flip a task between pending and completed.
    Toggle {
        /// Task identifier.
        id: u64,
    },
    /// Delete a task.
    Delete {
        /// Task identifier.
        id: u64,
    },
    /// Delete every task.
    Clear,
    /// Show task counts.
    Stats,
}

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let mut config = TaskStoreConfig::default();
    if let Some(max) = cli.max_description_chars {
        config = config.with_max_description_chars(max);
    }

    match cli.backend {
        Backend::Json => {
            let repository = JsonFileTaskRepository::open_ambient(&cli.data_dir, cli.slot.clone())
                .wrap_err_with(|| format!("open task slot in {}", cli.data_dir))?;
            run(repository, config, cli.command).await
        }
        Backend::Postgres => {
            let url = cli
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("the postgres backend needs --database-url or DATABASE_URL"))?;
            let pool = Pool::builder()
                .build(ConnectionManager::<PgConnection>::new(url))
                .wrap_err("connect to PostgreSQL")?;
            run(PostgresTaskRepository::new(pool), config, cli.command).await
        }
    }
}

async fn run<R: TaskRepository>(
    repository: R,
    config: TaskStoreConfig,
    command: Command,
) -> eyre::Result<ExitCode> {
    let store = TaskStore::with_config(Arc::new(repository), Arc::new(DefaultClock), config);
    let mut out = io::stdout().lock();

    match execute(&store, command, &mut out).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(CommandError::Store(err)) => {
            writeln!(io::stderr().lock(), "error [{}]: {err}", err.kind().as_str())?;
            Ok(ExitCode::FAILURE)
        }
        Err(CommandError::UnknownId(id)) => {
            writeln!(
                io::stderr().lock(),
                "error [{}]: task not found: {id}",
                TaskStoreErrorKind::NotFound.as_str()
            )?;
            Ok(ExitCode::FAILURE)
        }
        Err(CommandError::Other(err)) => Err(err),
    }
}

enum CommandError {
    Store(TaskStoreError),
    /// An identifier no task can carry, such as 0.
    UnknownId(u64),
    Other(eyre::Report),
}

impl From<TaskStoreError> for CommandError {
    fn from(err: TaskStoreError) -> Self {
        Self::Store(err)
    }
}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        Self::Other(err.into())
    }
}

/// Parses a command-line identifier; out-of-range values name no task.
fn task_id(raw: u64) -> Result<TaskId, CommandError> {
    TaskId::new(raw).map_err(|_| CommandError::UnknownId(raw))
}

async fn execute<R: TaskRepository>(
    store: &TaskStore<R, DefaultClock>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match command {
        Command::List => {
            let tasks = store.list().await?;
            if tasks.is_empty() {
                writeln!(out, "No tasks yet.")?;
            }
            for task in &tasks {
                writeln!(out, "{}", render_task(task))?;
            }
        }
        Command::Add { description, due } => {
            let mut request = CreateTaskRequest::new(description);
            if let Some(due_date) = due {
                request = request.with_due_date(due_date);
            }
            let task = store.create(request).await?;
            writeln!(out, "{}", render_task(&task))?;
        }
        Command::Toggle { id } => {
            let task = store.toggle(task_id(id)?).await?;
            writeln!(out, "{}", render_task(&task))?;
        }
        Command::Delete { id } => {
            store.delete(task_id(id)?).await?;
            writeln!(out, "Deleted task {id}.")?;
        }
        Command::Clear => {
            store.clear().await?;
            writeln!(out, "Cleared all tasks.")?;
        }
        Command::Stats => {
            let summary = store.summary().await?;
            writeln!(out, "{}", render_summary(&summary))?;
        }
    }
    Ok(())
}

fn render_task(task: &Task) -> String {
    let mark = if task.is_completed() { 'x' } else { ' ' };
    let due = task
        .due_date()
        .map(|date| format!(" (due {date})"))
        .unwrap_or_default();
    format!(
        "[{mark}] #{id} {description}{due}  created {created}",
        id = task.id(),
        description = task.description(),
        created = task.created_at().date_naive(),
    )
}

fn render_summary(summary: &TaskSummary) -> String {
    format!(
        "total: {}  completed: {}  pending: {}  done: {}%",
        summary.total, summary.completed, summary.pending, summary.completion_percentage
    )
}
