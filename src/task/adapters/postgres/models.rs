//! Diesel row models for task persistence.

use super::schema::todos;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Task description.
    pub task: String,
    /// Completion flag.
    pub completed: bool,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for task records. The identifier and completion flag come
/// from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub struct NewTaskRow {
    /// Task description.
    pub task: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
