//! User directory: local account creation and OAuth identity reconciliation

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::{OAuthProfile, User},
    repository::Repository,
    services::password::PasswordHasher,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    hasher: PasswordHasher,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            hasher: PasswordHasher,
        }
    }

    /// Create a local (email/password) account.
    ///
    /// The email is lowercase-normalized before the duplicate check so that a
    /// single address can never resolve to two identities.
    pub async fn create_local_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<User> {
        let email = normalize_email(email);

        if self.repository.users.get_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateAccount);
        }

        let password_hash = self.hasher.hash(password)?;

        self.repository
            .users
            .create_local(&email, &password_hash, display_name)
            .await
    }

    /// Find a user by email; absent is not an error
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repository
            .users
            .get_by_email(&normalize_email(email))
            .await
    }

    /// Find a user by id; absent is not an error
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.repository.users.get_by_id(id).await
    }

    /// Verify a plaintext password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        self.hasher.verify(password, hash)
    }

    /// Merge an external identity profile into the directory, keyed by email.
    ///
    /// An existing record gets its provider fields overwritten (last OAuth
    /// login wins on display fields); any stored password hash is preserved.
    /// An unknown email gets a fresh provider-only record.
    pub async fn reconcile_oauth_user(&self, profile: &OAuthProfile) -> AppResult<User> {
        let email = normalize_email(&profile.email);

        match self.repository.users.get_by_email(&email).await? {
            Some(_) => self.repository.users.update_oauth_fields(&email, profile).await,
            None => self.repository.users.create_oauth(&email, profile).await,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn emails_are_lowercase_normalized() {
        assert_eq!(normalize_email("A@X.Com"), "a@x.com");
        assert_eq!(normalize_email("  a@x.com "), "a@x.com");
    }
}
