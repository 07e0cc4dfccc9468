//! Authentication and authorization
//!
//! - [`password`]: Argon2id password hashing and strength rules
//! - [`jwt`]: HS256 access/refresh token issuing and validation
//! - [`middleware`]: Bearer token middleware producing a [`middleware::Caller`]
//! - [`ownership`]: The owner-only write guard

pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;
