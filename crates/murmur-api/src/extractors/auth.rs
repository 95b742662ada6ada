//! Session extractor
//!
//! Authenticates requests from the `murmur_session` http-only cookie, falling
//! back to an `Authorization: Bearer` header for non-browser clients.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use murmur_common::SESSION_COOKIE;
use murmur_core::Snowflake;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from the session credential
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// User ID from the session claims
    pub user_id: Snowflake,
}

impl SessionUser {
    /// Create a new SessionUser
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Locate the token: cookie first, then the bearer header
        let token = session_token(parts, state)
            .await
            .ok_or(ApiError::MissingAuth)?;

        // Get the app state to access the session service
        let app_state = AppState::from_ref(state);

        // Verify the token
        let claims = app_state.session_service().verify(&token).map_err(|e| {
            tracing::warn!(error = %e, "Rejected session credential");
            ApiError::App(e)
        })?;

        // Extract user ID from claims
        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!(error = %e, "Invalid user ID in session claims");
            ApiError::App(e)
        })?;

        Ok(SessionUser::new(user_id))
    }
}

/// Read the raw session token from the request, if one was sent
async fn session_token<S>(parts: &mut Parts, state: &S) -> Option<String>
where
    S: Send + Sync,
{
    if let Ok(jar) = CookieJar::from_request_parts(parts, state).await {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            return Some(cookie.value().to_string());
        }
    }

    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()?;

    Some(bearer.token().to_string())
}
