/// Reminder endpoints
///
/// All routes sit behind the JWT layer, which supplies the `Caller`.
/// Handlers only unwrap the request and wrap the response; the CRUD rules
/// live in `reminders_shared::reminders`.
///
/// # Endpoints
///
/// - `GET    /reminders` - List every reminder
/// - `POST   /reminders` - Create a reminder owned by the caller
/// - `GET    /reminders/:id` - Fetch one reminder
/// - `PATCH  /reminders/:id` - Partially update a reminder (owner only)
/// - `DELETE /reminders/:id` - Delete a reminder (owner only)

use crate::{
    app::AppState,
    error::{ApiJson, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use reminders_shared::{
    auth::middleware::Caller,
    models::reminder::{ReminderFields, ReminderView},
    reminders::{guards::parse_id, service},
};
use serde::{Deserialize, Serialize};

/// Request body for create and update: `{"reminder": {...}}`
///
/// A missing `reminder` key behaves like an empty object.
#[derive(Debug, Default, Deserialize)]
pub struct ReminderBody {
    #[serde(default)]
    pub reminder: ReminderFields,
}

/// Single reminder response
#[derive(Debug, Serialize)]
pub struct ReminderResponse {
    pub reminder: ReminderView,
}

/// Reminder collection response
#[derive(Debug, Serialize)]
pub struct ReminderListResponse {
    pub reminders: Vec<ReminderView>,
}

/// `GET /reminders`
pub async fn list_reminders(State(state): State<AppState>) -> ApiResult<Json<ReminderListResponse>> {
    let reminders = service::list(state.store.as_ref()).await?;

    Ok(Json(ReminderListResponse { reminders }))
}

/// `GET /reminders/:id`
///
/// Any authenticated caller may read any reminder.
pub async fn get_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReminderResponse>> {
    let reminder = service::get(state.store.as_ref(), parse_id(&id)?).await?;

    Ok(Json(ReminderResponse { reminder }))
}

/// `POST /reminders`
///
/// ```text
/// POST /reminders
/// Authorization: Bearer eyJ...
///
/// { "reminder": { "title": "magnify", "reminder": "drink water" } }
/// ```
///
/// Responds `201 Created` with the stored reminder. The owner is always
/// the caller.
pub async fn create_reminder(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<ReminderBody>,
) -> ApiResult<(StatusCode, Json<ReminderResponse>)> {
    let reminder = service::create(state.store.as_ref(), &caller, body.reminder).await?;

    Ok((StatusCode::CREATED, Json(ReminderResponse { reminder })))
}

/// `PATCH /reminders/:id`
///
/// Responds `204 No Content`. Blank fields are ignored and `owner` is never
/// changed.
pub async fn update_reminder(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ReminderBody>,
) -> ApiResult<StatusCode> {
    service::update(state.store.as_ref(), &caller, parse_id(&id)?, body.reminder).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /reminders/:id`
pub async fn delete_reminder(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service::delete(state.store.as_ref(), &caller, parse_id(&id)?).await?;

    Ok(StatusCode::NO_CONTENT)
}
