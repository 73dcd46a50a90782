//! Derived statistics over a task snapshot.

use super::Task;
use serde::Serialize;

/// Read-only counts derived from a list of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of tasks still pending.
    pub pending: usize,
    /// `round(completed / total * 100)`, or 0 for an empty list.
    pub completion_percentage: usize,
}

impl TaskSummary {
    /// Computes the summary of a task snapshot.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        Self {
            total,
            completed,
            pending: total.saturating_sub(completed),
            completion_percentage: completion_percentage(completed, total),
        }
    }
}

/// Rounds half up, matching the percentage shown by the original client.
fn completion_percentage(completed: usize, total: usize) -> usize {
    let numerator = completed.saturating_mul(200).saturating_add(total);
    numerator
        .checked_div(total.saturating_mul(2))
        .unwrap_or_default()
}
