/// Authentication endpoints
///
/// Issues the bearer tokens that the reminder routes require.
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get tokens
/// - `POST /auth/refresh` - Refresh access token

use crate::{
    app::AppState,
    error::{ApiError, ApiJson, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Json};
use reminders_shared::{
    auth::{jwt, password},
    models::user::CreateUser,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Register and login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// User ID
    pub user_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

fn validation_details(e: ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                ValidationErrorDetail::new(
                    field.to_string(),
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                )
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

fn issue_tokens(user_id: Uuid, secret: &str) -> ApiResult<TokenResponse> {
    let access_claims = jwt::Claims::new(user_id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user_id, jwt::TokenType::Refresh);

    Ok(TokenResponse {
        user_id: user_id.to_string(),
        access_token: jwt::create_token(&access_claims, secret)?,
        refresh_token: jwt::create_token(&refresh_claims, secret)?,
    })
}

/// Register a new user
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "SecureP@ss123" }
/// ```
///
/// Responds `201 Created` with the user ID and a token pair.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Invalid email or weak password
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    req.validate().map_err(validation_details)?;

    password::validate_password_strength(&req.password)
        .map_err(|e| ApiError::ValidationError(vec![ValidationErrorDetail::new("password", e)]))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .store
        .insert_user(CreateUser {
            email: req.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(issue_tokens(user.id, state.jwt_secret())?)))
}

/// Login endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "SecureP@ss123" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Malformed email
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(validation_details)?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(issue_tokens(user.id, state.jwt_secret())?))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
///
/// ```text
/// POST /auth/refresh
/// Content-Type: application/json
///
/// { "refresh_token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or access-type token
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
