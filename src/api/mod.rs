//! API handlers for Lectern REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::SignedCookieJar;
use uuid::Uuid;

use crate::{error::AppError, models::user::User, AppState};

/// Name of the signed session cookie
pub const SESSION_COOKIE: &str = "lectern_session";

/// Extractor for the authenticated user behind the session cookie.
/// Anonymous requests are rejected before any handler logic runs.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_session(parts, state).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(AppError::Unauthorized(
                "You must be logged in to access this resource.".to_string(),
            )),
        }
    }
}

/// Non-rejecting variant of [`CurrentUser`] for endpoints that report
/// session state instead of requiring it
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_session(parts, state).await?))
    }
}

async fn resolve_session(parts: &mut Parts, state: &AppState) -> Result<Option<User>, AppError> {
    // Type annotation pins the jar's key parameter so inference does not
    // drift to the blanket `FromRef` impl on `AppState`
    let jar: SignedCookieJar = SignedCookieJar::from_request_parts(parts, state)
        .await
        .map_err(|_| AppError::Internal("Cookie jar extraction failed".to_string()))?;

    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    state.services.sessions.resolve(cookie.value()).await
}

/// Parse a path identifier, rejecting malformed ids before any store access
pub fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::MalformedIdentifier(format!("Invalid ID format: {}", id)))
}
