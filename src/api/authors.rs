//! Author API endpoints

use axum::{extract::State, response::Response};

use crate::{
    models::{Author, CreateAuthor, UpdateAuthor},
    response::{created, ApiResponse},
    AppState,
};

use super::{JsonPayload, PathParam};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Author list", body = [Author]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> ApiResponse<Vec<Author>> {
    state.services.authors.get_all().await
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResponse<Author> {
    state.services.authors.get_by_id(id).await
}

/// Create author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input or name already used")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    JsonPayload(data): JsonPayload<CreateAuthor>,
) -> Response {
    let response = state.services.authors.create(&data).await;
    created(response, |author| format!("/api/v1/authors/{}", author.id))
}

/// Update author (full replace)
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input or name already used"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonPayload(data): JsonPayload<UpdateAuthor>,
) -> ApiResponse<Author> {
    state.services.authors.update(id, &data).await
}

/// Delete author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted"),
        (status = 400, description = "Author still has books"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResponse<()> {
    state.services.authors.delete(id).await
}
