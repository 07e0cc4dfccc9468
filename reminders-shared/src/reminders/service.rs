//! Reminder operations
//!
//! Generic over `S: ReminderStore + ?Sized` so callers can pass a concrete
//! store or a `&dyn Storage` trait object.

use uuid::Uuid;

use super::{guards::found, ReminderError};
use crate::auth::{middleware::Caller, ownership::require_ownership};
use crate::models::reminder::{validate_changes, validate_new, Reminder, ReminderFields, ReminderView};
use crate::store::ReminderStore;

/// Fetches a reminder the caller is allowed to modify
async fn fetch_owned<S>(store: &S, caller: &Caller, id: Uuid) -> Result<Reminder, ReminderError>
where
    S: ReminderStore + ?Sized,
{
    let reminder = found(store.find_reminder(id).await?)?;

    if let Err(e) = require_ownership(caller, &reminder) {
        tracing::warn!(
            reminder_id = %id,
            user_id = %caller.user_id,
            owner = %e.owner,
            "Rejected write to reminder owned by another user"
        );
        return Err(e.into());
    }

    Ok(reminder)
}

/// Every reminder, oldest first, unfiltered
pub async fn list<S>(store: &S) -> Result<Vec<ReminderView>, ReminderError>
where
    S: ReminderStore + ?Sized,
{
    let reminders = store.list_reminders().await?;

    Ok(reminders.into_iter().map(ReminderView::from).collect())
}

/// One reminder by ID
pub async fn get<S>(store: &S, id: Uuid) -> Result<ReminderView, ReminderError>
where
    S: ReminderStore + ?Sized,
{
    let reminder = found(store.find_reminder(id).await?)?;

    Ok(reminder.into())
}

/// Creates a reminder owned by `caller`
///
/// Any `owner` in `fields` is ignored.
pub async fn create<S>(store: &S, caller: &Caller, fields: ReminderFields) -> Result<ReminderView, ReminderError>
where
    S: ReminderStore + ?Sized,
{
    let data = validate_new(fields.without_owner(), caller.user_id)?;
    let reminder = store.insert_reminder(data).await?;

    tracing::info!(
        reminder_id = %reminder.id,
        user_id = %caller.user_id,
        title = %reminder.title,
        "Reminder created"
    );

    Ok(reminder.into())
}

/// Applies a partial update to a reminder the caller owns
///
/// Blank fields are treated as absent and `owner` can never change. The
/// guards run before validation, so a non-owner always sees `NotOwner`
/// regardless of what the body contains.
pub async fn update<S>(
    store: &S,
    caller: &Caller,
    id: Uuid,
    fields: ReminderFields,
) -> Result<(), ReminderError>
where
    S: ReminderStore + ?Sized,
{
    let fields = fields.strip_blanks().without_owner();

    fetch_owned(store, caller, id).await?;

    let changes = validate_changes(fields)?;
    if changes.is_empty() {
        tracing::debug!(reminder_id = %id, "Update contained no fields; nothing to write");
        return Ok(());
    }

    found(store.update_reminder(id, changes).await?)?;

    tracing::info!(reminder_id = %id, user_id = %caller.user_id, "Reminder updated");
    Ok(())
}

/// Deletes a reminder the caller owns
pub async fn delete<S>(store: &S, caller: &Caller, id: Uuid) -> Result<(), ReminderError>
where
    S: ReminderStore + ?Sized,
{
    fetch_owned(store, caller, id).await?;

    if !store.delete_reminder(id).await? {
        // Removed by a concurrent request after the fetch
        return Err(ReminderError::NotFound);
    }

    tracing::info!(reminder_id = %id, user_id = %caller.user_id, "Reminder deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reminder::{ReminderTitle, Violation};
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> ReminderFields {
        serde_json::from_value(value).unwrap()
    }

    async fn seed(store: &MemoryStore, owner: &Caller) -> ReminderView {
        create(
            store,
            owner,
            fields(json!({"title": "magnify", "reminder": "drink water"})),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_forces_owner() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());
        let mallory = Uuid::new_v4();

        let view = create(
            &store,
            &alice,
            fields(json!({"title": "magnify", "reminder": "drink water", "owner": mallory})),
        )
        .await
        .unwrap();

        assert_eq!(view.owner, alice.user_id);
        assert_eq!(view.title, ReminderTitle::Magnify);
        let stored = store.find_reminder(view.id).await.unwrap().unwrap();
        assert_eq!(stored.owner, alice.user_id);
    }

    #[tokio::test]
    async fn test_create_invalid_title() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());

        let err = create(
            &store,
            &alice,
            fields(json!({"title": "unknown", "reminder": "x"})),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ReminderError::Validation(ref v) if matches!(v[0], Violation::InvalidTitle(_))));
        assert!(store.list_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());
        let bob = Caller::new(Uuid::new_v4());

        let first = seed(&store, &alice).await;
        let second = seed(&store, &bob).await;

        assert_eq!(get(&store, first.id).await.unwrap(), first);

        let all = list(&store).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&first));
        assert!(all.contains(&second));
    }

    #[tokio::test]
    async fn test_update_keeps_owner_and_ignores_blanks() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());
        let view = seed(&store, &alice).await;

        update(
            &store,
            &alice,
            view.id,
            fields(json!({"title": "energize", "reminder": "", "owner": Uuid::new_v4()})),
        )
        .await
        .unwrap();

        let stored = store.find_reminder(view.id).await.unwrap().unwrap();
        assert_eq!(stored.title, ReminderTitle::Energize);
        assert_eq!(stored.reminder, "drink water");
        assert_eq!(stored.owner, alice.user_id);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());
        let bob = Caller::new(Uuid::new_v4());
        let view = seed(&store, &alice).await;
        let before = store.find_reminder(view.id).await.unwrap();

        let err = update(&store, &bob, view.id, fields(json!({"reminder": "hijacked"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ReminderError::NotOwner(_)));

        let err = delete(&store, &bob, view.id).await.unwrap_err();
        assert!(matches!(err, ReminderError::NotOwner(_)));

        assert_eq!(store.find_reminder(view.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());
        let id = Uuid::new_v4();

        assert!(matches!(get(&store, id).await, Err(ReminderError::NotFound)));
        assert!(matches!(
            update(&store, &alice, id, fields(json!({"reminder": "x"}))).await,
            Err(ReminderError::NotFound)
        ));
        assert!(matches!(delete(&store, &alice, id).await, Err(ReminderError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_invalid_title_leaves_record() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());
        let view = seed(&store, &alice).await;

        let err = update(&store, &alice, view.id, fields(json!({"title": "nope"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ReminderError::Validation(_)));

        let stored = store.find_reminder(view.id).await.unwrap().unwrap();
        assert_eq!(stored.title, ReminderTitle::Magnify);
    }

    #[tokio::test]
    async fn test_update_with_only_blanks_writes_nothing() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());
        let view = seed(&store, &alice).await;
        let before = store.find_reminder(view.id).await.unwrap().unwrap();

        update(
            &store,
            &alice,
            view.id,
            fields(json!({"title": "", "reminder": " "})),
        )
        .await
        .unwrap();

        let after = store.find_reminder(view.id).await.unwrap().unwrap();
        assert_eq!(after.updated_at, before.updated_at);
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let store = MemoryStore::new();
        let alice = Caller::new(Uuid::new_v4());
        let view = seed(&store, &alice).await;

        delete(&store, &alice, view.id).await.unwrap();

        assert!(store.find_reminder(view.id).await.unwrap().is_none());
    }
}
