//! Persistence adapters for the task module.
//!
//! This module provides concrete implementations of the [`TaskRepository`]
//! port. Adapters handle all infrastructure concerns while the domain keeps
//! validation and ordering.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryTaskRepository`]: Thread-safe in-memory storage for
//!   tests
//! - [`json::JsonFileTaskRepository`]: Whole-list JSON blob in a single named
//!   slot on disk
//! - [`postgres::PostgresTaskRepository`]: `PostgreSQL` persistence using
//!   Diesel ORM
//!
//! [`TaskRepository`]: crate::task::ports::TaskRepository

pub mod json;
pub mod memory;
pub mod postgres;
