//! Database layer
//!
//! - `pool`: PostgreSQL connection pool with a startup health check
//! - `migrations`: Embedded sqlx migrations
//!
//! Models live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
