//! SQLite event store.
//!
//! This module provides:
//! - Store initialization, pragmas and migrations
//! - Repository for appending and replaying events

pub mod migrations;
pub mod repo;

pub use migrations::{database_exists, init_db, remove_db_files};
pub use repo::Repository;
