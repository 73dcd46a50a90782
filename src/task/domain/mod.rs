//! Domain model for task tracking.
//!
//! The domain owns validation of descriptions and due dates and the listing
//! order, while keeping all infrastructure concerns outside of the domain
//! boundary.

mod error;
mod ids;
mod summary;
mod task;

pub use error::TaskDomainError;
pub use ids::{TaskDescription, TaskId};
pub use summary::TaskSummary;
pub use task::{NewTask, PersistedTaskData, Task, sort_newest_first};
