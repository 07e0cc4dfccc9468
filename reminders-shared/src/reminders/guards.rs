//! Precondition checks shared by the reminder operations

use uuid::Uuid;

use super::ReminderError;

/// Passes a fetched record through, or fails with `NotFound`
pub fn found<T>(record: Option<T>) -> Result<T, ReminderError> {
    record.ok_or(ReminderError::NotFound)
}

/// Parses a path identifier
///
/// A string that is not a UUID cannot name any reminder, so it is reported
/// as `NotFound` rather than as a bad request.
pub fn parse_id(raw: &str) -> Result<Uuid, ReminderError> {
    Uuid::parse_str(raw).map_err(|_| ReminderError::NotFound)
}
