//! Repository contract and store flows against the `todos` table.

use super::cluster::{BoxError, PostgresCluster, TemporaryDatabase, postgres_cluster};
use chrono::{DateTime, Days, Local, TimeZone, Utc};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};
use smarttodo::task::{
    adapters::postgres::{PostgresTaskRepository, TaskPgPool},
    domain::{NewTask, TaskDescription},
    ports::{TaskRepository, TaskRepositoryError},
    services::{CreateTaskRequest, TaskStore, TaskStoreErrorKind},
};
use std::sync::Arc;
use uuid::Uuid;

struct PgContext {
    repository: Arc<PostgresTaskRepository>,
    store: TaskStore<PostgresTaskRepository, DefaultClock>,
    _database: TemporaryDatabase,
}

/// Clock frozen at one instant.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn setup(cluster: PostgresCluster) -> Result<PgContext, BoxError> {
    let database = cluster.temporary_database(&format!("smarttodo_{}", Uuid::new_v4().simple()))?;
    let pool: TaskPgPool = Pool::builder()
        .max_size(2)
        .build(ConnectionManager::<PgConnection>::new(database.url()))?;
    let repository = Arc::new(PostgresTaskRepository::new(pool));
    let store = TaskStore::new(Arc::clone(&repository), Arc::new(DefaultClock));
    Ok(PgContext {
        repository,
        store,
        _database: database,
    })
}

#[fixture]
fn context(postgres_cluster: Result<PostgresCluster, BoxError>) -> Result<PgContext, BoxError> {
    setup(postgres_cluster?)
}

fn draft(description: &str, clock: &impl Clock) -> Result<NewTask, BoxError> {
    let description = TaskDescription::new(description, TaskDescription::DEFAULT_MAX_CHARS)?;
    Ok(NewTask::new(description, None, clock)?)
}

#[rstest]
#[ignore = "starts an embedded PostgreSQL cluster"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_assigns_ids_and_lists_newest_first(
    context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    let first = ctx.repository.store(&draft("Buy milk", &DefaultClock)?).await?;
    let second = ctx.repository.store(&draft("Call dentist", &DefaultClock)?).await?;

    assert!(second.id() > first.id());
    assert!(!first.is_completed());
    assert_eq!(ctx.repository.list().await?, vec![second, first]);
    Ok(())
}

#[rstest]
#[ignore = "starts an embedded PostgreSQL cluster"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_breaks_timestamp_ties_by_descending_id(
    context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let instant = Utc
        .with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
        .single()
        .ok_or("invalid timestamp")?;
    let clock = FixedClock(instant);

    let first = ctx.repository.store(&draft("first", &clock)?).await?;
    let second = ctx.repository.store(&draft("second", &clock)?).await?;

    assert_eq!(first.created_at(), second.created_at());
    assert_eq!(ctx.repository.list().await?, vec![second, first]);
    Ok(())
}

#[rstest]
#[ignore = "starts an embedded PostgreSQL cluster"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_update_and_delete_report_missing_rows(
    context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    let mut task = ctx.repository.store(&draft("Buy milk", &DefaultClock)?).await?;
    task.toggle();
    ctx.repository.update(&task).await?;
    assert_eq!(ctx.repository.find_by_id(task.id()).await?, Some(task.clone()));

    ctx.repository.delete(task.id()).await?;
    assert!(matches!(
        ctx.repository.update(&task).await,
        Err(TaskRepositoryError::NotFound(id)) if id == task.id()
    ));
    assert!(matches!(
        ctx.repository.delete(task.id()).await,
        Err(TaskRepositoryError::NotFound(id)) if id == task.id()
    ));
    assert_eq!(ctx.repository.find_by_id(task.id()).await?, None);
    Ok(())
}

#[rstest]
#[ignore = "starts an embedded PostgreSQL cluster"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_clear_reports_removed_rows_without_reusing_ids(
    context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    ctx.repository.store(&draft("Buy milk", &DefaultClock)?).await?;
    let newest = ctx.repository.store(&draft("Call dentist", &DefaultClock)?).await?;

    assert_eq!(ctx.repository.clear().await?, 2);
    assert!(ctx.repository.list().await?.is_empty());

    let next = ctx.repository.store(&draft("Write report", &DefaultClock)?).await?;
    assert!(next.id() > newest.id());
    Ok(())
}

#[rstest]
#[ignore = "starts an embedded PostgreSQL cluster"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_store_end_to_end(context: Result<PgContext, BoxError>) -> Result<(), BoxError> {
    let ctx = context?;
    let store = &ctx.store;
    let tomorrow = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .ok_or("date overflow")?;

    let milk = store.create(CreateTaskRequest::new("Buy milk")).await?;
    let report = store
        .create(CreateTaskRequest::new("Write report").with_due_date(tomorrow))
        .await?;
    store.create(CreateTaskRequest::new("Call dentist")).await?;
    store.toggle(report.id()).await?;
    store.delete(milk.id()).await?;

    let listed = store.list().await?;
    let descriptions: Vec<&str> = listed
        .iter()
        .map(|task| task.description().as_str())
        .collect();
    assert_eq!(descriptions, vec!["Call dentist", "Write report"]);
    assert_eq!(listed.get(1).and_then(|task| task.due_date()), Some(tomorrow));
    assert_eq!(store.summary().await?.completion_percentage, 50);

    let missing = store
        .toggle(milk.id())
        .await
        .err()
        .ok_or("toggle of a deleted task should fail")?;
    assert_eq!(missing.kind(), TaskStoreErrorKind::NotFound);
    Ok(())
}
