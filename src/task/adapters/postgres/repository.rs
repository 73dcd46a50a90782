//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::todos,
};
use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskDescription, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Identifiers come from the `todos.id` sequence, which never hands out a
/// value twice.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, draft: &NewTask) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(draft);
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(todos::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let key = to_key(task_id)?;
        let completed = task.is_completed();
        self.run_blocking(move |connection| {
            let affected = diesel::update(todos::table.find(key))
                .set(todos::completed.eq(completed))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            require_affected(affected, task_id)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let key = to_key(id)?;
        self.run_blocking(move |connection| {
            let row = todos::table
                .find(key)
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = todos::table
                .order((todos::created_at.desc(), todos::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let key = to_key(id)?;
        self.run_blocking(move |connection| {
            let affected = diesel::delete(todos::table.find(key))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            require_affected(affected, id)
        })
        .await
    }

    async fn clear(&self) -> TaskRepositoryResult<usize> {
        self.run_blocking(|connection| {
            diesel::delete(todos::table)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn to_key(id: TaskId) -> TaskRepositoryResult<i64> {
    i64::try_from(id.value()).map_err(TaskRepositoryError::persistence)
}

fn require_affected(affected: usize, id: TaskId) -> TaskRepositoryResult<()> {
    if affected == 0 {
        return Err(TaskRepositoryError::NotFound(id));
    }
    Ok(())
}

fn to_new_row(draft: &NewTask) -> NewTaskRow {
    NewTaskRow {
        task: draft.description().as_str().to_owned(),
        due_date: draft.due_date(),
        created_at: draft.created_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id: key,
        task: persisted_description,
        completed,
        due_date,
        created_at,
    } = row;

    let raw_id = u64::try_from(key).map_err(TaskRepositoryError::persistence)?;
    let id = TaskId::new(raw_id).map_err(TaskRepositoryError::persistence)?;
    // Length limits apply at creation only.
    let description = TaskDescription::new(persisted_description, usize::MAX)
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id,
        description,
        completed,
        due_date,
        created_at,
    }))
}
