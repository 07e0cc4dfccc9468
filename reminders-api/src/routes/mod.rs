/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `reminders`: Reminder CRUD, bearer token required

pub mod auth;
pub mod health;
pub mod reminders;
