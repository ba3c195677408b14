//! Bearer-token session extraction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use dockwarden_control::{ControlError, Principal, SessionToken};

use crate::error::ApiError;
use crate::routes::AppState;

/// Reads the session token from `Authorization: Bearer <token>`.
///
/// # Errors
///
/// Returns an unauthenticated error if the header is missing or malformed.
pub fn bearer_token(headers: &HeaderMap) -> Result<SessionToken, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(SessionToken::new)
        .ok_or(ApiError::Control(ControlError::Unauthenticated))
}

/// The principal of an authenticated request.
#[derive(Debug)]
pub struct Authenticated {
    /// Session the request presented.
    pub token: SessionToken,
    /// Identity and role behind the session.
    pub principal: Principal,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let principal = state.plane.principal(&token)?;
        Ok(Self { token, principal })
    }
}
