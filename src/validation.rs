//! Request validation pipeline
//!
//! Validation runs before any handler executes: payloads are deserialized,
//! every field rule is evaluated (no short-circuit across fields), and all
//! violations are collected into a structured `{field, message}` report.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use chrono::{Datelike, Utc};
use serde::{de::DeserializeOwned, Deserialize};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::{AppError, FieldError};

/// JSON extractor that validates the payload before the handler runs
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(collect_field_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validator output into `{field, message}` pairs.
///
/// Struct-level (cross-field) rules are reported under the error code, which
/// carries the JSON name of the field the violation is attributed to.
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(violations) => {
                for violation in violations {
                    let name = if *field == "__all__" {
                        violation.code.to_string()
                    } else {
                        camel_case(field)
                    };
                    let message = violation
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", name));
                    out.push(FieldError::new(name, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                out.extend(collect_field_errors(nested));
            }
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    out.extend(collect_field_errors(nested));
                }
            }
        }
    }
    out
}

/// Convert a Rust field name to its JSON (camelCase) spelling
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Validate an ISBN-10 or ISBN-13, ignoring hyphens and spaces
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    let cleaned: String = isbn
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    let valid = match cleaned.len() {
        10 => is_valid_isbn10(&cleaned),
        13 => is_valid_isbn13(&cleaned),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("isbn");
        error.message = Some("Invalid ISBN format. Must be a valid ISBN-10 or ISBN-13.".into());
        Err(error)
    }
}

fn is_valid_isbn10(s: &str) -> bool {
    let mut sum: u32 = 0;
    for (i, c) in s.chars().enumerate() {
        let value = match c.to_digit(10) {
            Some(d) => d,
            // 'X' is only valid as the check digit
            None if (c == 'X' || c == 'x') && i == 9 => 10,
            None => return false,
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

fn is_valid_isbn13(s: &str) -> bool {
    let mut sum: u32 = 0;
    for (i, c) in s.chars().enumerate() {
        let value = match c.to_digit(10) {
            Some(d) => d,
            None => return false,
        };
        sum += value * if i % 2 == 0 { 1 } else { 3 };
    }
    sum % 10 == 0
}

/// Year bound check: 1000 up to the current calendar year at validation time
pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    let current_year = Utc::now().year();
    if (1000..=current_year).contains(&year) {
        Ok(())
    } else {
        let mut error = ValidationError::new("year");
        error.message = Some("Must be a valid year".into());
        Err(error)
    }
}

/// Serde helper that trims surrounding whitespace during deserialization,
/// so length rules and handlers both see the sanitized value
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isbn13_with_hyphens_is_valid() {
        assert!(validate_isbn("978-0743273565").is_ok());
        assert!(validate_isbn("978-0-306-40615-7").is_ok());
    }

    #[test]
    fn isbn10_checksum() {
        assert!(validate_isbn("0306406152").is_ok());
        assert!(validate_isbn("080442957X").is_ok());
        assert!(validate_isbn("0306406153").is_err());
    }

    #[test]
    fn isbn_rejects_wrong_length_and_garbage() {
        assert!(validate_isbn("12345").is_err());
        assert!(validate_isbn("abcdefghij").is_err());
        // 'X' anywhere but the ISBN-10 check digit position
        assert!(validate_isbn("X306406152").is_err());
    }

    #[test]
    fn year_upper_bound_is_current_year() {
        let current = Utc::now().year();
        assert!(validate_year(current).is_ok());
        assert!(validate_year(1000).is_ok());
        assert!(validate_year(current + 1).is_err());
        assert!(validate_year(999).is_err());
    }

    #[test]
    fn field_names_are_camel_cased() {
        assert_eq!(camel_case("publish_year"), "publishYear");
        assert_eq!(camel_case("title"), "title");
        assert_eq!(camel_case("available_copies"), "availableCopies");
    }
}
