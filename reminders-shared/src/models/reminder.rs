//! Reminder model, validation and database operations
//!
//! A reminder is a short note tagged with one of three fixed titles. Every
//! reminder has an owner (the user who created it). Only the owner may change
//! or delete it; any authenticated user may read it.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE reminders (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     title TEXT NOT NULL CHECK (title IN ('cultivate', 'magnify', 'energize')),
//!     reminder TEXT NOT NULL CHECK (reminder <> ''),
//!     owner UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! # Write path
//!
//! Client input arrives as [`ReminderFields`], where every field is optional
//! and `owner` is accepted only so it can be thrown away. It is turned into a
//! [`NewReminder`] by [`validate_new`] or into [`ReminderChanges`] by
//! [`validate_changes`]. Neither of those types can carry a client-chosen owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// The fixed set of reminder titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderTitle {
    Cultivate,
    Magnify,
    Energize,
}

impl ReminderTitle {
    /// All accepted titles, in display order
    pub const ALL: [ReminderTitle; 3] = [
        ReminderTitle::Cultivate,
        ReminderTitle::Magnify,
        ReminderTitle::Energize,
    ];

    /// Converts title to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderTitle::Cultivate => "cultivate",
            ReminderTitle::Magnify => "magnify",
            ReminderTitle::Energize => "energize",
        }
    }
}

impl fmt::Display for ReminderTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the accepted titles
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid title (expected cultivate, magnify or energize)")]
pub struct InvalidTitle(pub String);

impl FromStr for ReminderTitle {
    type Err = InvalidTitle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cultivate" => Ok(ReminderTitle::Cultivate),
            "magnify" => Ok(ReminderTitle::Magnify),
            "energize" => Ok(ReminderTitle::Energize),
            other => Err(InvalidTitle(other.to_string())),
        }
    }
}

impl TryFrom<String> for ReminderTitle {
    type Error = InvalidTitle;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Stored reminder
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Reminder {
    /// Unique reminder ID, assigned by storage
    pub id: Uuid,

    /// One of the fixed titles
    #[sqlx(try_from = "String")]
    pub title: ReminderTitle,

    /// Free-form reminder text
    pub reminder: String,

    /// User who created the reminder
    pub owner: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Reminder {
    fn owner_id(&self) -> Uuid {
        self.owner
    }
}

/// Validated input for creating a reminder
///
/// `owner` is always the authenticated caller, filled in by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub title: ReminderTitle,
    pub reminder: String,
    pub owner: Uuid,
}

/// Validated partial update
///
/// Only `Some` fields are written. Ownership never changes, so there is no
/// `owner` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderChanges {
    pub title: Option<ReminderTitle>,
    pub reminder: Option<String>,
}

impl ReminderChanges {
    /// True when the update would not touch any column
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.reminder.is_none()
    }

    /// Applies the changes to an in-memory record
    pub fn apply_to(self, reminder: &mut Reminder) {
        if let Some(title) = self.title {
            reminder.title = title;
        }
        if let Some(text) = self.reminder {
            reminder.reminder = text;
        }
    }
}

/// Reminder fields as sent by a client
///
/// Used for both create and update bodies. `owner` is captured (any JSON
/// type) so it never fails deserialization, and is discarded before the
/// fields reach storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderFields {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub reminder: Option<String>,

    #[serde(default)]
    pub owner: Option<serde_json::Value>,
}

impl ReminderFields {
    /// Drops fields that were sent as blank strings
    ///
    /// A blank field in a partial update means "not provided", not "clear it".
    pub fn strip_blanks(mut self) -> Self {
        self.title = self.title.filter(|v| !is_blank(v));
        self.reminder = self.reminder.filter(|v| !is_blank(v));
        if matches!(&self.owner, Some(serde_json::Value::String(s)) if is_blank(s)) {
            self.owner = None;
        }
        self
    }

    /// Discards any client-supplied owner
    pub fn without_owner(mut self) -> Self {
        if self.owner.take().is_some() {
            tracing::debug!("Discarding client-supplied reminder owner");
        }
        self
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A single rule broken by client input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// Required field absent or blank
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Title outside the fixed set
    #[error(transparent)]
    InvalidTitle(#[from] InvalidTitle),
}

impl Violation {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Violation::Required { field } => field,
            Violation::InvalidTitle(_) => "title",
        }
    }
}

/// Validates a create body and binds it to `owner`
///
/// Collects every violation instead of stopping at the first.
pub fn validate_new(fields: ReminderFields, owner: Uuid) -> Result<NewReminder, Vec<Violation>> {
    let mut violations = Vec::new();

    let title = match fields.title.as_deref().filter(|v| !is_blank(v)) {
        None => {
            violations.push(Violation::Required { field: "title" });
            None
        }
        Some(raw) => match raw.parse::<ReminderTitle>() {
            Ok(title) => Some(title),
            Err(e) => {
                violations.push(e.into());
                None
            }
        },
    };

    let reminder = fields.reminder.filter(|v| !is_blank(v));
    if reminder.is_none() {
        violations.push(Violation::Required { field: "reminder" });
    }

    match (title, reminder) {
        (Some(title), Some(reminder)) if violations.is_empty() => Ok(NewReminder {
            title,
            reminder,
            owner,
        }),
        _ => Err(violations),
    }
}

/// Validates an update body that has already had its blanks stripped
pub fn validate_changes(fields: ReminderFields) -> Result<ReminderChanges, Vec<Violation>> {
    let title = match fields.title {
        Some(raw) => Some(
            raw.parse::<ReminderTitle>()
                .map_err(|e| vec![Violation::from(e)])?,
        ),
        None => None,
    };

    Ok(ReminderChanges {
        title,
        reminder: fields.reminder,
    })
}

/// Wire representation of a reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderView {
    pub id: Uuid,
    pub title: ReminderTitle,
    pub reminder: String,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Reminder> for ReminderView {
    fn from(r: &Reminder) -> Self {
        Self {
            id: r.id,
            title: r.title,
            reminder: r.reminder.clone(),
            owner: r.owner,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<Reminder> for ReminderView {
    fn from(r: Reminder) -> Self {
        Self {
            id: r.id,
            title: r.title,
            reminder: r.reminder,
            owner: r.owner,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const COLUMNS: &str = "id, title, reminder, owner, created_at, updated_at";

impl Reminder {
    /// Lists every reminder, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM reminders ORDER BY created_at ASC, id ASC", COLUMNS);

        sqlx::query_as::<_, Reminder>(&query).fetch_all(pool).await
    }

    /// Finds a reminder by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM reminders WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Reminder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Inserts a validated reminder
    pub async fn create(pool: &PgPool, data: NewReminder) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO reminders (title, reminder, owner) VALUES ($1, $2, $3) RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, Reminder>(&query)
            .bind(data.title.as_str())
            .bind(data.reminder)
            .bind(data.owner)
            .fetch_one(pool)
            .await
    }

    /// Applies a partial update
    ///
    /// `updated_at` is always bumped. Returns `None` if the reminder no
    /// longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: ReminderChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE reminders SET updated_at = NOW()");
        let mut bind_count = 1;

        if changes.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if changes.reminder.is_some() {
            bind_count += 1;
            query.push_str(&format!(", reminder = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", COLUMNS));

        let mut q = sqlx::query_as::<_, Reminder>(&query).bind(id);

        if let Some(title) = changes.title {
            q = q.bind(title.as_str());
        }
        if let Some(text) = changes.reminder {
            q = q.bind(text);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a reminder, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
