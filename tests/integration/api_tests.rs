//! API integration tests
//!
//! These run against a live server. Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080";

/// Client with a cookie store, so the session cookie follows along
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client")
}

/// Unique email per run, to avoid colliding with earlier test data
fn fresh_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}+{}@lectern.test", tag, nanos)
}

/// Helper to sign up and log in, leaving the session cookie in the client
async fn signup_and_login(client: &Client, email: &str, password: &str) -> Value {
    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "email": email,
            "password": password,
            "displayName": "Test User"
        }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 200);

    response.json().await.expect("Failed to parse login response")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_signup_login_roundtrip() {
    let client = client();
    let email = fresh_email("roundtrip");

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret1",
            "displayName": "A"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let signup_id = body["user"]["id"].as_str().expect("No user id").to_string();
    // The password hash never appears in responses
    assert!(body["user"].get("password").is_none());

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["id"].as_str(), Some(signup_id.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_signup_is_rejected() {
    let client = client();
    let email = fresh_email("duplicate");

    for attempt in 0..2 {
        let response = client
            .post(format!("{}/auth/signup", BASE_URL))
            .json(&json!({
                "email": email,
                "password": "secret1",
                "displayName": "Dup"
            }))
            .send()
            .await
            .expect("Failed to send request");

        if attempt == 0 {
            assert_eq!(response.status(), 201);
        } else {
            assert_eq!(response.status(), 400);
            let body: Value = response.json().await.expect("Failed to parse response");
            assert_eq!(body["error"], "duplicate_account");
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_login_wrong_password() {
    let client = client();
    let email = fresh_email("wrongpw");
    signup_and_login(&client, &email, "secret1").await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
#[ignore]
async fn test_login_unknown_email_is_generic() {
    let response = client()
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": fresh_email("nobody"), "password": "whatever" }))
        .send()
        .await
        .expect("Failed to send request");

    // Same rejection as a wrong password: no account-existence leak
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
#[ignore]
async fn test_login_malformed_body_gets_structured_error() {
    let response = client()
        .post(format!("{}/auth/login", BASE_URL))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    // still the uniform error envelope, not a bare text body
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_success_landing_reflects_session() {
    let client = client();
    let email = fresh_email("success");
    signup_and_login(&client, &email, "secret1").await;

    let response = client
        .get(format!("{}/auth/success", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], email.to_lowercase());
}

#[tokio::test]
#[ignore]
async fn test_success_landing_requires_a_session() {
    let response = client()
        .get(format!("{}/auth/success", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_session_status_and_logout() {
    let client = client();
    let email = fresh_email("session");
    signup_and_login(&client, &email, "secret1").await;

    let response = client
        .get(format!("{}/auth/status", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["email"], email.to_lowercase());

    let response = client
        .get(format!("{}/auth/logout", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/auth/status", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["authenticated"], false);

    // Logging out again is not an error
    let response = client
        .get(format!("{}/auth/logout", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_signup_validation_collects_all_violations() {
    let response = client()
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "email": "not-an-email",
            "password": "short",
            "displayName": "  "
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "validation_failed");
    let details = body["details"].as_array().expect("No details array");
    assert_eq!(details.len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_catalog_access() {
    let response = client()
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_book_crud() {
    let client = client();
    let email = fresh_email("books");
    signup_and_login(&client, &email, "secret1").await;

    // Create
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "The Great Gatsby",
            "author": "F. Scott Fitzgerald",
            "isbn": "978-0743273565",
            "publishYear": 1925,
            "genre": "Classic Fiction",
            "description": "A classic American novel set in the Jazz Age.",
            "availableCopies": 5,
            "totalCopies": 5
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id"].as_str().expect("No book id").to_string();

    // Read
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Delete
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    // Gone
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_book_cross_field_validation() {
    let client = client();
    let email = fresh_email("crossfield");
    signup_and_login(&client, &email, "secret1").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Overbooked",
            "author": "Nobody",
            "isbn": "978-0743273565",
            "publishYear": 2000,
            "genre": "Testing",
            "description": "More copies available than exist in total.",
            "availableCopies": 5,
            "totalCopies": 2
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "validation_failed");
    let details = body["details"].as_array().expect("No details array");
    assert!(details.iter().any(|d| d["field"] == "totalCopies"));
}

#[tokio::test]
#[ignore]
async fn test_malformed_id_is_rejected_before_the_store() {
    let client = client();
    let email = fresh_email("badid");
    signup_and_login(&client, &email, "secret1").await;

    let response = client
        .get(format!("{}/books/not-a-uuid", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "malformed_identifier");
}
