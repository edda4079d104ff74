//! Author catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::author::{Author, AuthorPayload},
    validation::ValidatedJson,
    AppState,
};

use super::{parse_id, CurrentUser};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = [Author]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// Get an author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author found", body = Author),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Author>> {
    let id = parse_id(&id)?;
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Add a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorPayload,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    ValidatedJson(payload): ValidatedJson<AuthorPayload>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.catalog.create_author(&payload).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Validation error or malformed ID"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<AuthorPayload>,
) -> AppResult<Json<Author>> {
    let id = parse_id(&id)?;
    let author = state.services.catalog.update_author(id, &payload).await?;
    Ok(Json(author))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
