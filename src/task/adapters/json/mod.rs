//! Local-blob adapter: the task list serialized as JSON in one named slot.

mod records;
mod repository;

pub use repository::{DEFAULT_SLOT, JsonFileTaskRepository};
