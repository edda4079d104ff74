//! Lectern Book Library Catalog
//!
//! A Rust REST JSON API for a book-library catalog (books, authors) with
//! session-based authentication: local email/password accounts and Google
//! OAuth identities reconciled into a single user directory.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    cookie_key: Key,
}

impl AppState {
    pub fn new(config: AppConfig, services: services::Services) -> Self {
        let cookie_key = derive_cookie_key(&config.session.secret);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            cookie_key,
        }
    }
}

// Lets the signed cookie jar pull its key straight from application state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}

/// Stretch the configured session secret into a 64-byte cookie signing key
fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
