//! Task aggregate root and creation draft.

use super::{TaskDescription, TaskDomainError, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::Serialize;

/// Validated input for a task that has not been assigned an identifier yet.
///
/// Repositories turn a draft into a [`Task`] by allocating the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    description: TaskDescription,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates a draft stamped with the clock's current UTC time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DueDateInPast`] when `due_date` is earlier
    /// than the current UTC calendar date.
    pub fn new(
        description: TaskDescription,
        due_date: Option<NaiveDate>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let created_at = clock.utc();
        let today = created_at.date_naive();
        if let Some(due) = due_date
            && due < today
        {
            return Err(TaskDomainError::DueDateInPast {
                due_date: due,
                today,
            });
        }

        Ok(Self {
            description,
            due_date,
            created_at,
        })
    }

    /// Returns the validated description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the requested due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Completes the draft with a repository-assigned identifier.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            description: self.description,
            completed: false,
            due_date: self.due_date,
            created_at: self.created_at,
        }
    }
}

/// Task aggregate root.
///
/// Tasks are built by repositories from a [`NewTask`] or from persisted data;
/// they are serializable for consumers but never deserialized directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    description: TaskDescription,
    completed: bool,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    ///
    /// The due date is not revalidated: a task stored yesterday with a due
    /// date of yesterday is still valid today.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            description: data.description,
            completed: data.completed,
            due_date: data.due_date,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Flips the completion flag.
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Sorts tasks newest first, breaking timestamp ties by descending id.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_unstable_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
