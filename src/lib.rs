//! SmartTodo: a minimal single-user task tracker.
//!
//! The crate keeps a list of tasks, each with a description, an optional due
//! date, and a completion flag. Tasks can be created, listed newest first,
//! toggled, deleted, and cleared, and the store reports derived completion
//! statistics.
//!
//! # Architecture
//!
//! SmartTodo follows hexagonal architecture principles:
//!
//! - **Domain**: validated task types and pure derivations
//! - **Ports**: the asynchronous repository contract
//! - **Adapters**: in-memory, JSON slot, and `PostgreSQL` repositories
//! - **Services**: the [`task::services::TaskStore`] orchestrating it all
//!
//! # Modules
//!
//! - [`task`]: task domain, persistence, and store operations

pub mod task;
