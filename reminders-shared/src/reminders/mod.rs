//! Ownership-checked reminder CRUD
//!
//! Each operation takes the storage backend and the authenticated
//! [`Caller`](crate::auth::middleware::Caller) as plain arguments and runs
//! a fixed sequence:
//!
//! ```text
//! list    fetch all → serialize
//! get     fetch → found → serialize
//! create  drop owner → validate → insert
//! update  strip blanks → drop owner → fetch → found → owned → validate → update
//! delete  fetch → found → owned → delete
//! ```
//!
//! A guard failure stops the sequence before anything is written. Errors are
//! returned as [`ReminderError`] and never handled here.

pub mod guards;
pub mod service;

use crate::auth::ownership::OwnershipError;
use crate::models::reminder::Violation;
use crate::store::StoreError;

/// Failure of a reminder operation
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    /// Client input broke one or more schema rules
    #[error("Reminder validation failed: {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    /// No reminder with the requested ID
    #[error("Reminder not found")]
    NotFound,

    /// Caller is authenticated but does not own the reminder
    #[error(transparent)]
    NotOwner(#[from] OwnershipError),

    /// Storage failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<Vec<Violation>> for ReminderError {
    fn from(violations: Vec<Violation>) -> Self {
        ReminderError::Validation(violations)
    }
}
