//! Google OAuth client: authorization redirect and code-for-profile exchange
//!
//! The consent redirect and token exchange are delegated to the provider;
//! this module only builds the redirect URL and turns a callback code into
//! an identity profile for reconciliation.

use reqwest::Url;
use serde::Deserialize;

use crate::{
    config::OAuthConfig,
    error::{AppError, AppResult},
    models::user::OAuthProfile,
};

#[derive(Clone)]
pub struct OAuthService {
    http: reqwest::Client,
    config: OAuthConfig,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

impl OAuthService {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build the provider consent-screen URL for the login redirect
    pub fn authorize_url(&self) -> AppResult<Url> {
        Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.google_client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
            ],
        )
        .map_err(|e| AppError::Internal(format!("Invalid OAuth authorize URL: {}", e)))
    }

    /// Exchange an authorization code for an identity profile
    pub async fn fetch_profile(&self, code: &str) -> AppResult<OAuthProfile> {
        let token: TokenResponse = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.google_client_id.as_str()),
                ("client_secret", self.config.google_client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(exchange_failed)?
            .json()
            .await
            .map_err(exchange_failed)?;

        let info: UserInfo = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(exchange_failed)?
            .json()
            .await
            .map_err(exchange_failed)?;

        Ok(OAuthProfile {
            subject: info.sub,
            display_name: info.name.unwrap_or_else(|| info.email.clone()),
            email: info.email,
            photo: info.picture,
        })
    }
}

fn exchange_failed(e: reqwest::Error) -> AppError {
    tracing::warn!("OAuth exchange failed: {}", e);
    AppError::Unauthorized("Google authentication failed".to_string())
}
