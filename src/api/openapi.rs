//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lectern API",
        version = "1.0.0",
        description = "Book Library Catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::signup,
        auth::login,
        auth::google_start,
        auth::google_callback,
        auth::success,
        auth::failure,
        auth::status,
        auth::logout,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
    ),
    components(
        schemas(
            // Auth
            auth::AuthResponse,
            auth::SessionStatus,
            crate::models::user::User,
            crate::models::user::AuthProvider,
            crate::models::user::SignupRequest,
            crate::models::user::LoginRequest,
            // Books
            crate::models::book::Book,
            crate::models::book::BookPayload,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorPayload,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and session endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "authors", description = "Author catalog management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
