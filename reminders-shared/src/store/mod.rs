//! Storage access traits
//!
//! Handlers never talk to a database directly. They receive a storage object
//! implementing these traits, which keeps the CRUD logic independent of the
//! backend:
//!
//! - [`postgres::PgStore`]: sqlx/PostgreSQL, used in production
//! - [`memory::MemoryStore`]: in-process maps, used for local runs and tests
//!
//! All methods are single attempts; nothing here retries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    reminder::{NewReminder, Reminder, ReminderChanges},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

/// Storage failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for reminders
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Every reminder, oldest first
    async fn list_reminders(&self) -> StoreResult<Vec<Reminder>>;

    async fn find_reminder(&self, id: Uuid) -> StoreResult<Option<Reminder>>;

    async fn insert_reminder(&self, data: NewReminder) -> StoreResult<Reminder>;

    /// Applies a partial update and bumps `updated_at`.
    /// Returns `None` if the reminder does not exist.
    async fn update_reminder(&self, id: Uuid, changes: ReminderChanges) -> StoreResult<Option<Reminder>>;

    /// Returns whether a reminder was removed
    async fn delete_reminder(&self, id: Uuid) -> StoreResult<bool>;
}

/// Persistence for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] if the email is taken
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Case-insensitive lookup
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// A complete storage backend
#[async_trait]
pub trait Storage: ReminderStore + UserStore {
    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;

    /// Checks the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
