//! Application services for task tracking.

mod config;
mod store;

pub use config::TaskStoreConfig;
pub use store::{
    CreateTaskRequest, TaskStore, TaskStoreError, TaskStoreErrorKind, TaskStoreResult,
};
