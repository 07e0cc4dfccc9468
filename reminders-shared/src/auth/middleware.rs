//! Bearer token authentication for Axum
//!
//! [`require_token`] reads `Authorization: Bearer <token>`, validates it as an
//! access token and stores the resulting [`Caller`] in the request
//! extensions. Handlers then take `Extension<Caller>`.
//!
//! Requests without a valid token never reach the handler.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};

/// Identity of the authenticated user making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Authenticated user ID (JWT `sub`)
    pub user_id: Uuid,
}

impl Caller {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Why a request could not be authenticated
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header present but not `Bearer <token>`
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Header is not valid ASCII".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Validates the request's bearer token and returns the caller
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Caller, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_access_token(token, secret)?;

    Ok(Caller::new(claims.sub))
}

/// JWT authentication middleware
///
/// On success the request continues with a [`Caller`] extension. On failure
/// the error is returned to the caller of this function, which decides how
/// to render it.
pub async fn require_token(secret: &str, mut req: Request, next: Next) -> Result<Response, AuthError> {
    let caller = match authenticate(req.headers(), secret) {
        Ok(caller) => caller,
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting unauthenticated request");
            return Err(e);
        }
    };

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
