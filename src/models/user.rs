//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Origin of an identity: local password account or an external OAuth provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Local,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
        }
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AuthProvider::Local),
            "google" => Ok(AuthProvider::Google),
            _ => Err(format!("Invalid auth provider: {}", s)),
        }
    }
}

// SQLx conversion for AuthProvider (stored as text)
impl sqlx::Type<Postgres> for AuthProvider {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AuthProvider {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AuthProvider {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Full user model from the store
///
/// The password hash and provider subject id never leave the server: both
/// are skipped during serialization.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Lowercase-normalized, unique across providers
    pub email: String,
    /// Argon2 hash, present only for local accounts
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub display_name: String,
    pub auth_provider: AuthProvider,
    /// OAuth subject id, present only for provider accounts
    #[serde(skip_serializing)]
    pub google_id: Option<String>,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity profile handed back by the OAuth provider after the redirect
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthProfile {
    /// Provider-issued subject id
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub photo: Option<String>,
}

/// Signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Display name must be between 1 and 100 characters"))]
    pub display_name: String,
}

/// Login request. Carries no field rules: a login attempt with any shape of
/// email or password resolves through the generic credentials rejection.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
