//! # Taskboard Shared Library
//!
//! Domain types, persistence and business rules for the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Storage trait with Postgres and in-memory backends
//! - `auth`: Password hashing, session tokens and project authorization
//! - `services`: Project, task and member operations
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
