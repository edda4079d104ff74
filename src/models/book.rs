//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::{validate_isbn, validate_year};

/// Full book model from the store
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publish_year: i32,
    pub genre: String,
    pub description: String,
    pub available_copies: i32,
    pub total_copies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book payload for create and update requests (all fields required)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_copies, skip_on_field_errors = false))]
pub struct BookPayload {
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Author must be between 1 and 100 characters"))]
    pub author: String,
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(custom(function = validate_isbn))]
    pub isbn: String,
    #[validate(custom(function = validate_publish_year))]
    pub publish_year: i32,
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(length(min = 1, max = 50, message = "Genre must be between 1 and 50 characters"))]
    pub genre: String,
    #[serde(deserialize_with = "crate::validation::trimmed")]
    #[validate(length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters"))]
    pub description: String,
    #[validate(range(min = 0, message = "Available copies must be a non-negative integer"))]
    pub available_copies: i32,
    #[validate(range(min = 1, message = "Total copies must be a positive integer"))]
    pub total_copies: i32,
}

fn validate_publish_year(year: i32) -> Result<(), ValidationError> {
    validate_year(year).map_err(|mut e| {
        e.message = Some("Publish year must be a valid year".into());
        e
    })
}

/// Cross-field rule: the total must cover the available copies
fn validate_copies(payload: &BookPayload) -> Result<(), ValidationError> {
    if payload.total_copies < payload.available_copies {
        // Code carries the JSON field the violation is attributed to
        let mut error = ValidationError::new("totalCopies");
        error.message = Some("Total copies cannot be less than available copies".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::collect_field_errors;

    fn payload() -> BookPayload {
        BookPayload {
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            isbn: "978-0743273565".to_string(),
            publish_year: 1925,
            genre: "Classic Fiction".to_string(),
            description: "A classic American novel set in the Jazz Age.".to_string(),
            available_copies: 5,
            total_copies: 5,
        }
    }

    #[test]
    fn valid_book_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn total_copies_below_available_is_a_cross_field_violation() {
        let mut book = payload();
        book.total_copies = 2;
        let errors = book.validate().unwrap_err();
        let fields = collect_field_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "totalCopies");
        assert!(fields[0].message.contains("cannot be less than"));
    }

    #[test]
    fn all_violations_are_collected_in_one_pass() {
        let mut book = payload();
        book.title.clear();
        book.isbn = "not-an-isbn".to_string();
        book.description = "short".to_string();
        book.total_copies = 0;
        let errors = book.validate().unwrap_err();
        let fields = collect_field_errors(&errors);
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert!(names.contains(&"title"));
        assert!(names.contains(&"isbn"));
        assert!(names.contains(&"description"));
        assert!(names.contains(&"totalCopies"));
    }
}
