//! # Reminders Shared Library
//!
//! Domain types, storage and authentication used by the reminders API.
//!
//! ## Module Organization
//!
//! - `models`: Users and reminders, validation rules, wire representation
//! - `auth`: Password hashing, JWT, bearer middleware, ownership guard
//! - `store`: Storage traits with PostgreSQL and in-memory backends
//! - `reminders`: The ownership-checked CRUD operations
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod reminders;
pub mod store;

/// Current version of the reminders shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
