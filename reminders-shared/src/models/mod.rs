//! Database models
//!
//! - `user`: User accounts (reminder owners)
//! - `reminder`: Reminders, their validation rules and wire representation

pub mod reminder;
pub mod user;
