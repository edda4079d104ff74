//! Users repository for store operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::{AuthProvider, OAuthProfile, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID; absent is not an error
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get user by email (exact match on the stored, normalized value)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Insert a new local account.
    ///
    /// Two signups racing on the same email are resolved by the unique index;
    /// the losing insert surfaces as `DuplicateAccount`.
    pub async fn create_local(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, display_name, auth_provider)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(AuthProvider::Local)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// Insert a new provider-only account (no password hash)
    pub async fn create_oauth(&self, email: &str, profile: &OAuthProfile) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, display_name, auth_provider, google_id, photo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(&profile.display_name)
        .bind(AuthProvider::Google)
        .bind(&profile.subject)
        .bind(&profile.photo)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// Overwrite provider-specific fields on an existing record, keyed by
    /// email. The stored password hash is left untouched.
    pub async fn update_oauth_fields(
        &self,
        email: &str,
        profile: &OAuthProfile,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET google_id = $2,
                display_name = $3,
                photo = $4,
                auth_provider = $5,
                updated_at = NOW()
            WHERE email = $1
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(&profile.subject)
        .bind(&profile.display_name)
        .bind(&profile.photo)
        .bind(AuthProvider::Google)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }
}

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateAccount,
        _ => AppError::Database(e),
    }
}
