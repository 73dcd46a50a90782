//! Service layer owning task validation, ordering, and mutation.

use super::TaskStoreConfig;
use crate::task::{
    domain::{
        NewTask, Task, TaskDescription, TaskDomainError, TaskId, TaskSummary, sort_newest_first,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    description: String,
    due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    /// Creates a request with the raw, untrimmed description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            due_date: None,
        }
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Failure classes a transport maps to bad input, not found, or internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStoreErrorKind {
    /// The request was rejected by validation.
    Validation,
    /// The request referenced a task that does not exist.
    NotFound,
    /// The storage medium failed.
    Persistence,
}

impl TaskStoreErrorKind {
    /// Returns a stable machine-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Persistence => "persistence",
        }
    }
}

/// Service-level errors for task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Domain validation failed; the store is unchanged.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// No task has the given identifier; the store is unchanged.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Persistence(TaskRepositoryError),
}

impl TaskStoreError {
    /// Returns the failure class.
    #[must_use]
    pub const fn kind(&self) -> TaskStoreErrorKind {
        match self {
            Self::Validation(_) => TaskStoreErrorKind::Validation,
            Self::NotFound(_) => TaskStoreErrorKind::NotFound,
            Self::Persistence(_) => TaskStoreErrorKind::Persistence,
        }
    }
}

impl From<TaskRepositoryError> for TaskStoreError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other @ TaskRepositoryError::Persistence(_) => Self::Persistence(other),
        }
    }
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task store: the single writer over a task repository.
///
/// Mutating operations hold an exclusive lock for their whole duration, so
/// a toggle's read-modify-write never interleaves with another mutation.
#[derive(Clone)]
pub struct TaskStore<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: TaskStoreConfig,
    write_lock: Arc<Mutex<()>>,
}

impl<R, C> TaskStore<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a store with the default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, TaskStoreConfig::default())
    }

    /// Creates a store with an explicit configuration.
    #[must_use]
    pub fn with_config(repository: Arc<R>, clock: Arc<C>, config: TaskStoreConfig) -> Self {
        Self {
            repository,
            clock,
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &TaskStoreConfig {
        &self.config
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Validation`] when the description is empty,
    /// too long, or the due date is in the past, and
    /// [`TaskStoreError::Persistence`] when the repository rejects the write.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskStoreResult<Task> {
        let description =
            TaskDescription::new(&request.description, self.config.max_description_chars)?;
        let _guard = self.write_lock.lock().await;
        let draft = NewTask::new(description, request.due_date, &*self.clock)?;
        let task = self.repository.store(&draft).await?;

        info!(
            id = %task.id(),
            description = %task.description(),
            due_date = ?task.due_date(),
            "created task"
        );
        Ok(task)
    }

    /// Returns every task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the repository cannot be
    /// read.
    pub async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let mut tasks = self.repository.list().await?;
        sort_newest_first(&mut tasks);
        debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    /// Flips the completion flag of a task and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when no task has `id`.
    pub async fn toggle(&self, id: TaskId) -> TaskStoreResult<Task> {
        let _guard = self.write_lock.lock().await;
        let Some(mut task) = self.repository.find_by_id(id).await? else {
            warn!(id = %id, "toggle rejected, task not found");
            return Err(TaskStoreError::NotFound(id));
        };

        task.toggle();
        self.repository.update(&task).await?;

        info!(id = %id, completed = task.is_completed(), "toggled task");
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when no task has `id`.
    pub async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let _guard = self.write_lock.lock().await;
        match self.repository.delete(id).await {
            Ok(()) => {
                info!(id = %id, "deleted task");
                Ok(())
            }
            Err(TaskRepositoryError::NotFound(missing)) => {
                warn!(id = %missing, "delete rejected, task not found");
                Err(TaskStoreError::NotFound(missing))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes every task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the repository fails.
    pub async fn clear(&self) -> TaskStoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let removed = self.repository.clear().await?;
        info!(removed, "cleared tasks");
        Ok(())
    }

    /// Returns counts derived from the current task list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the repository cannot be
    /// read.
    pub async fn summary(&self) -> TaskStoreResult<TaskSummary> {
        let tasks = self.repository.list().await?;
        Ok(TaskSummary::from_tasks(&tasks))
    }
}
