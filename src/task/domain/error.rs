//! Error types for task domain validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The description exceeds the configured character limit.
    #[error("task description is {length} characters long, maximum is {max}")]
    DescriptionTooLong {
        /// Character count of the trimmed description.
        length: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The due date lies before the creation date.
    #[error("due date {due_date} is earlier than today ({today})")]
    DueDateInPast {
        /// Requested due date.
        due_date: NaiveDate,
        /// Calendar date at creation time.
        today: NaiveDate,
    },

    /// The task identifier is invalid.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(u64),
}
