//! Task tracking for SmartTodo.
//!
//! This module owns the task list: creating tasks with validated
//! descriptions and due dates, listing them newest first, toggling
//! completion, deleting, and clearing. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
