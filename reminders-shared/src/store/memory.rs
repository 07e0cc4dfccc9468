//! In-memory storage backend
//!
//! Mirrors the PostgreSQL backend's observable behavior: storage-assigned
//! UUIDs and timestamps, case-insensitive unique emails, oldest-first
//! listing, and deletion of a user's reminders along with the user.
//! Nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ReminderStore, Storage, StoreError, StoreResult, UserStore};
use crate::models::{
    reminder::{NewReminder, Reminder, ReminderChanges},
    user::{CreateUser, User},
};

/// Storage held in process memory
#[derive(Default)]
pub struct MemoryStore {
    reminders: RwLock<HashMap<Uuid, Reminder>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user and every reminder they own
    pub async fn delete_user(&self, id: Uuid) -> bool {
        let removed = self.users.write().await.remove(&id).is_some();
        if removed {
            self.reminders.write().await.retain(|_, r| r.owner != id);
        }
        removed
    }
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn list_reminders(&self) -> StoreResult<Vec<Reminder>> {
        let mut all: Vec<Reminder> = self.reminders.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_reminder(&self, id: Uuid) -> StoreResult<Option<Reminder>> {
        Ok(self.reminders.read().await.get(&id).cloned())
    }

    async fn insert_reminder(&self, data: NewReminder) -> StoreResult<Reminder> {
        let now = Utc::now();
        let reminder = Reminder {
            id: Uuid::new_v4(),
            title: data.title,
            reminder: data.reminder,
            owner: data.owner,
            created_at: now,
            updated_at: now,
        };

        self.reminders
            .write()
            .await
            .insert(reminder.id, reminder.clone());

        Ok(reminder)
    }

    async fn update_reminder(&self, id: Uuid, changes: ReminderChanges) -> StoreResult<Option<Reminder>> {
        let mut reminders = self.reminders.write().await;

        Ok(reminders.get_mut(&id).map(|reminder| {
            changes.apply_to(reminder);
            reminder.updated_at = Utc::now();
            reminder.clone()
        }))
    }

    async fn delete_reminder(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.reminders.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email.eq_ignore_ascii_case(&data.email)) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl Storage for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reminder::ReminderTitle;

    fn new_reminder(owner: Uuid, text: &str) -> NewReminder {
        NewReminder {
            title: ReminderTitle::Cultivate,
            reminder: text.to_string(),
            owner,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let reminder = store.insert_reminder(new_reminder(owner, "water plants")).await.unwrap();

        assert_eq!(reminder.owner, owner);
        assert_eq!(reminder.created_at, reminder.updated_at);
        assert_eq!(store.find_reminder(reminder.id).await.unwrap(), Some(reminder));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryStore::new();

        let result = store
            .update_reminder(Uuid::new_v4(), ReminderChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(CreateUser {
                email: "a@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let other = Uuid::new_v4();

        store.insert_reminder(new_reminder(user.id, "mine")).await.unwrap();
        let kept = store.insert_reminder(new_reminder(other, "theirs")).await.unwrap();

        assert!(store.delete_user(user.id).await);
        assert!(store.find_user(user.id).await.unwrap().is_none());
        assert_eq!(store.list_reminders().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let create = |email: &str| CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
        };

        store.insert_user(create("Someone@Example.com")).await.unwrap();
        let result = store.insert_user(create("someone@example.com")).await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert!(store
            .find_user_by_email("SOMEONE@example.com")
            .await
            .unwrap()
            .is_some());
    }
}
