//! Book API endpoints

use axum::{extract::State, response::Response};

use crate::{
    models::{Book, CreateBook, UpdateBook},
    response::{created, updated, ApiResponse},
    AppState,
};

use super::{JsonPayload, PathParam};

/// List all books with their genre and author names
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = [Book]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> ApiResponse<Vec<Book>> {
    state.services.books.get_all().await
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResponse<Book> {
    state.services.books.get_by_id(id).await
}

/// List books of a genre. An unknown genre gives an empty list.
#[utoipa::path(
    get,
    path = "/books/genre/{genre_id}",
    tag = "books",
    params(("genre_id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Books of the genre", body = [Book])
    )
)]
pub async fn list_books_by_genre(
    State(state): State<AppState>,
    PathParam(genre_id): PathParam<i32>,
) -> ApiResponse<Vec<Book>> {
    state.services.books.get_by_genre(genre_id).await
}

/// List books of an author. An unknown author gives an empty list.
#[utoipa::path(
    get,
    path = "/books/author/{author_id}",
    tag = "books",
    params(("author_id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books of the author", body = [Book])
    )
)]
pub async fn list_books_by_author(
    State(state): State<AppState>,
    PathParam(author_id): PathParam<i32>,
) -> ApiResponse<Vec<Book>> {
    state.services.books.get_by_author(author_id).await
}

/// Create book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input, or genre/author not found")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonPayload(data): JsonPayload<CreateBook>,
) -> Response {
    let response = state.services.books.create(&data).await;
    created(response, |book| format!("/api/v1/books/{}", book.id))
}

/// Update book (full replace)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book, genre or author not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonPayload(data): JsonPayload<UpdateBook>,
) -> Response {
    updated(state.services.books.update(id, &data).await)
}

/// Delete book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResponse<()> {
    state.services.books.delete(id).await
}
