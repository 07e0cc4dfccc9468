//! PostgreSQL storage backend
//!
//! Thin adapter from the storage traits onto the model query functions.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ReminderStore, Storage, StoreError, StoreResult, UserStore};
use crate::db::pool;
use crate::models::{
    reminder::{NewReminder, Reminder, ReminderChanges},
    user::{CreateUser, User},
};

/// Storage backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps unique violations to [`StoreError::Conflict`]
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return StoreError::Conflict(constraint);
        }
    }

    StoreError::Database(err)
}

#[async_trait]
impl ReminderStore for PgStore {
    async fn list_reminders(&self) -> StoreResult<Vec<Reminder>> {
        Reminder::list(&self.pool).await.map_err(classify)
    }

    async fn find_reminder(&self, id: Uuid) -> StoreResult<Option<Reminder>> {
        Reminder::find_by_id(&self.pool, id).await.map_err(classify)
    }

    async fn insert_reminder(&self, data: NewReminder) -> StoreResult<Reminder> {
        Reminder::create(&self.pool, data).await.map_err(classify)
    }

    async fn update_reminder(&self, id: Uuid, changes: ReminderChanges) -> StoreResult<Option<Reminder>> {
        Reminder::update(&self.pool, id, changes).await.map_err(classify)
    }

    async fn delete_reminder(&self, id: Uuid) -> StoreResult<bool> {
        Reminder::delete(&self.pool, id).await.map_err(classify)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        User::create(&self.pool, data).await.map_err(classify)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        User::find_by_id(&self.pool, id).await.map_err(classify)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        User::find_by_email(&self.pool, email).await.map_err(classify)
    }
}

#[async_trait]
impl Storage for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await.map_err(StoreError::from)
    }
}
