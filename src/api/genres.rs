//! Genre API endpoints

use axum::{extract::State, response::Response};

use crate::{
    models::{CreateGenre, Genre, UpdateGenre},
    response::{created, ApiResponse},
    AppState,
};

use super::{JsonPayload, PathParam};

/// List all genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genre list", body = [Genre]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> ApiResponse<Vec<Genre>> {
    state.services.genres.get_all().await
}

/// Get genre by ID
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResponse<Genre> {
    state.services.genres.get_by_id(id).await
}

/// Create genre
#[utoipa::path(
    post,
    path = "/genres",
    tag = "genres",
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input or name already used")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    JsonPayload(data): JsonPayload<CreateGenre>,
) -> Response {
    let response = state.services.genres.create(&data).await;
    created(response, |genre| format!("/api/v1/genres/{}", genre.id))
}

/// Update genre (full replace)
#[utoipa::path(
    put,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = UpdateGenre,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 400, description = "Invalid input or name already used"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonPayload(data): JsonPayload<UpdateGenre>,
) -> ApiResponse<Genre> {
    state.services.genres.update(id, &data).await
}

/// Delete genre
#[utoipa::path(
    delete,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre deleted"),
        (status = 400, description = "Genre still has books"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResponse<()> {
    state.services.genres.delete(id).await
}
