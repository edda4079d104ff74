//! Authentication strategies
//!
//! Each login attempt runs one of two verifiers over a canonical user
//! record: local (email + password) or OAuth (provider-issued profile).
//! An attempt ends `Verified`, `Rejected` (with a reason), or errored
//! (store/hash fault, surfaced through `AppError`).

use crate::{
    error::{AppError, AppResult},
    models::user::{OAuthProfile, User},
    services::users::UsersService,
};

/// Input to an authentication attempt
#[derive(Debug)]
pub enum Credentials {
    Local { email: String, password: String },
    OAuth(OAuthProfile),
}

/// Why a login attempt was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Generic reason covering unknown email and wrong password alike,
    /// so a response never reveals whether an account exists
    InvalidCredentials,
    /// The account exists but only under the external provider
    ProviderOnly,
}

impl Rejection {
    pub fn into_error(self) -> AppError {
        match self {
            Rejection::InvalidCredentials => AppError::InvalidCredentials,
            Rejection::ProviderOnly => AppError::ProviderMismatch(
                "This account uses Google Sign-In. Please log in with Google.".to_string(),
            ),
        }
    }
}

/// Terminal state of an authentication attempt
#[derive(Debug)]
pub enum AuthOutcome {
    Verified(User),
    Rejected(Rejection),
}

#[derive(Clone)]
pub struct AuthService {
    users: UsersService,
}

impl AuthService {
    pub fn new(users: UsersService) -> Self {
        Self { users }
    }

    /// Run one authentication attempt to its terminal state
    pub async fn authenticate(&self, credentials: Credentials) -> AppResult<AuthOutcome> {
        match credentials {
            Credentials::Local { email, password } => self.local(&email, &password).await,
            Credentials::OAuth(profile) => self.oauth(&profile).await,
        }
    }

    async fn local(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(AuthOutcome::Rejected(Rejection::InvalidCredentials));
        };

        let Some(ref hash) = user.password else {
            // Provider-only account: the one rejection that surfaces a hint
            return Ok(AuthOutcome::Rejected(Rejection::ProviderOnly));
        };

        if !self.users.verify_password(password, hash) {
            return Ok(AuthOutcome::Rejected(Rejection::InvalidCredentials));
        }

        Ok(AuthOutcome::Verified(user))
    }

    /// Any profile returned by the provider is trusted; there is no
    /// `Rejected` state on this path, only reconciliation or a store error.
    async fn oauth(&self, profile: &OAuthProfile) -> AppResult<AuthOutcome> {
        let user = self.users.reconcile_oauth_user(profile).await?;
        Ok(AuthOutcome::Verified(user))
    }
}
