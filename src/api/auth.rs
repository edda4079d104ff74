//! Authentication endpoints: signup, login, OAuth, session status, logout

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    SignedCookieJar,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::SessionConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, SignupRequest, User},
    services::auth::{AuthOutcome, Credentials},
    validation::ValidatedJson,
    AppState,
};

use super::{MaybeUser, SESSION_COOKIE};

/// Response body for signup/login/logout
#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Session status report
#[derive(Serialize, ToSchema)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Create a new local account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Validation error or duplicate account")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user = state
        .services
        .users
        .create_local_user(&payload.email, &payload.password, &payload.display_name)
        .await?;

    tracing::info!(user_id = %user.id, "local account created");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User created successfully. You can now log in.".to_string(),
            user: Some(user),
        }),
    ))
}

/// Log in with email and password, issuing a session cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or provider-only account")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(SignedCookieJar, Json<AuthResponse>)> {
    let outcome = state
        .services
        .auth
        .authenticate(Credentials::Local {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    match outcome {
        AuthOutcome::Verified(user) => {
            let token = state.services.sessions.open(&user);
            let jar = jar.add(session_cookie(token, &state.config.session));

            tracing::info!(user_id = %user.id, "login successful");

            Ok((
                jar,
                Json(AuthResponse {
                    success: true,
                    message: "Login successful".to_string(),
                    user: Some(user),
                }),
            ))
        }
        AuthOutcome::Rejected(rejection) => Err(rejection.into_error()),
    }
}

/// Initiate the Google OAuth login redirect
#[utoipa::path(
    get,
    path = "/auth/google",
    tag = "auth",
    responses(
        (status = 307, description = "Redirect to the provider consent screen")
    )
)]
pub async fn google_start(State(state): State<AppState>) -> AppResult<Redirect> {
    let url = state.services.oauth.authorize_url()?;
    Ok(Redirect::temporary(url.as_str()))
}

#[derive(Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
}

/// Handle the provider redirect back: exchange the code, reconcile the
/// profile into the user directory, open a session
#[utoipa::path(
    get,
    path = "/auth/google/callback",
    tag = "auth",
    params(
        ("code" = Option<String>, Query, description = "Authorization code from the provider")
    ),
    responses(
        (status = 303, description = "Redirect to the success location, or to /auth/failure")
    )
)]
pub async fn google_callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let Some(code) = query.code else {
        return Ok((jar, Redirect::to("/auth/failure")));
    };

    let profile = match state.services.oauth.fetch_profile(&code).await {
        Ok(profile) => profile,
        Err(_) => return Ok((jar, Redirect::to("/auth/failure"))),
    };

    // Store failures propagate; the provider profile itself is trusted
    match state
        .services
        .auth
        .authenticate(Credentials::OAuth(profile))
        .await?
    {
        AuthOutcome::Verified(user) => {
            let token = state.services.sessions.open(&user);
            let jar = jar.add(session_cookie(token, &state.config.session));

            tracing::info!(user_id = %user.id, "oauth login successful");

            Ok((jar, Redirect::to(&state.config.oauth.success_redirect)))
        }
        AuthOutcome::Rejected(rejection) => Err(rejection.into_error()),
    }
}

/// OAuth success landing: reflects the freshly opened session back to the
/// browser after the provider redirect chain completes
#[utoipa::path(
    get,
    path = "/auth/success",
    tag = "auth",
    responses(
        (status = 200, description = "Authentication successful", body = AuthResponse),
        (status = 401, description = "No active session")
    )
)]
pub async fn success(MaybeUser(user): MaybeUser) -> AppResult<Json<AuthResponse>> {
    let Some(user) = user else {
        return Err(AppError::Unauthorized("Not authenticated".to_string()));
    };

    Ok(Json(AuthResponse {
        success: true,
        message: "Authentication successful".to_string(),
        user: Some(user),
    }))
}

/// OAuth failure landing
#[utoipa::path(
    get,
    path = "/auth/failure",
    tag = "auth",
    responses(
        (status = 401, description = "Authentication failed", body = AuthResponse)
    )
)]
pub async fn failure() -> (StatusCode, Json<AuthResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(AuthResponse {
            success: false,
            message: "Authentication failed".to_string(),
            user: None,
        }),
    )
}

/// Report the current session state; never rejects
#[utoipa::path(
    get,
    path = "/auth/status",
    tag = "auth",
    responses(
        (status = 200, description = "Authentication status", body = SessionStatus)
    )
)]
pub async fn status(MaybeUser(user): MaybeUser) -> Json<SessionStatus> {
    Json(SessionStatus {
        authenticated: user.is_some(),
        user,
    })
}

/// Destroy the current session; destroying an absent session is not an error
#[utoipa::path(
    get,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = AuthResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Json<AuthResponse>)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.services.sessions.close(cookie.value());
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            message: "Logged out successfully".to_string(),
            user: None,
        }),
    ))
}

// The max-age is fixed at issuance and bounds the session even though the
// server-side expiry slides on activity
fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(config.ttl_hours as i64))
        .build()
}
