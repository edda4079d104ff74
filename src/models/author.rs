//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::validate_year;

/// Full author model from the store
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub birth_year: i32,
    pub nationality: String,
    pub biography: String,
    /// Titles attributed to this author
    pub books: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author payload for create and update requests
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(custom(function = validate_birth_year))]
    pub birth_year: i32,
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(length(min = 1, max = 50, message = "Nationality must be between 1 and 50 characters"))]
    pub nationality: String,
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(length(min = 10, max = 2000, message = "Biography must be between 10 and 2000 characters"))]
    pub biography: String,
    /// Optional list of book titles
    #[serde(default)]
    pub books: Vec<String>,
}

fn validate_birth_year(year: i32) -> Result<(), ValidationError> {
    validate_year(year).map_err(|mut e| {
        e.message = Some("Birth year must be a valid year".into());
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn payload() -> AuthorPayload {
        AuthorPayload {
            name: "Ursula K. Le Guin".to_string(),
            birth_year: 1929,
            nationality: "American".to_string(),
            biography: "Author of speculative fiction and the Earthsea cycle.".to_string(),
            books: vec!["A Wizard of Earthsea".to_string()],
        }
    }

    #[test]
    fn valid_author_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn birth_year_in_the_future_is_rejected() {
        let mut author = payload();
        author.birth_year = Utc::now().year() + 1;
        assert!(author.validate().is_err());
    }

    #[test]
    fn biography_must_meet_minimum_length() {
        let mut author = payload();
        author.biography = "too short".to_string();
        assert!(author.validate().is_err());
    }
}
