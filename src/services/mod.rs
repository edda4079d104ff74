//! Business logic services

pub mod auth;
pub mod catalog;
pub mod oauth;
pub mod password;
pub mod sessions;
pub mod users;

use crate::{
    config::{OAuthConfig, SessionConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub auth: auth::AuthService,
    pub sessions: sessions::SessionsService,
    pub catalog: catalog::CatalogService,
    pub oauth: oauth::OAuthService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        session_config: &SessionConfig,
        oauth_config: OAuthConfig,
    ) -> Self {
        let users = users::UsersService::new(repository.clone());
        let store = sessions::SessionStore::new(session_config.ttl_hours);

        Self {
            auth: auth::AuthService::new(users.clone()),
            sessions: sessions::SessionsService::new(users.clone(), store),
            catalog: catalog::CatalogService::new(repository),
            oauth: oauth::OAuthService::new(oauth_config),
            users,
        }
    }
}
