//! Book service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, CreateBook, EntityKind, UpdateBook},
    repository::{AuthorStore, BookStore, CatalogStore, GenreStore},
    response::ApiResponse,
};

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn CatalogStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> ApiResponse<Vec<Book>> {
        ApiResponse::from_result(
            self.store.books_list(BookFilter::All).await,
            "Books retrieved successfully",
            "Failed to retrieve books",
        )
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResponse<Book> {
        let result = self
            .store
            .books_get(id)
            .await
            .and_then(|book| book.ok_or_else(|| AppError::not_found(EntityKind::Book)));
        ApiResponse::from_result(result, "Book retrieved successfully", "Failed to retrieve book")
    }

    /// Books of a genre. An unknown genre yields an empty list, not an error.
    pub async fn get_by_genre(&self, genre_id: i32) -> ApiResponse<Vec<Book>> {
        ApiResponse::from_result(
            self.store.books_list(BookFilter::Genre(genre_id)).await,
            "Books by genre retrieved successfully",
            "Failed to retrieve books by genre",
        )
    }

    /// Books of an author. An unknown author yields an empty list, not an error.
    pub async fn get_by_author(&self, author_id: i32) -> ApiResponse<Vec<Book>> {
        ApiResponse::from_result(
            self.store.books_list(BookFilter::Author(author_id)).await,
            "Books by author retrieved successfully",
            "Failed to retrieve books by author",
        )
    }

    pub async fn create(&self, data: &CreateBook) -> ApiResponse<Book> {
        ApiResponse::from_result(
            self.try_create(data).await,
            "Book created successfully",
            "Failed to create book",
        )
    }

    pub async fn update(&self, id: i32, data: &UpdateBook) -> ApiResponse<Book> {
        ApiResponse::from_result(
            self.try_update(id, data).await,
            "Book updated successfully",
            "Failed to update book",
        )
    }

    pub async fn delete(&self, id: i32) -> ApiResponse<()> {
        ApiResponse::from_outcome(
            self.try_delete(id).await,
            "Book deleted successfully",
            "Failed to delete book",
        )
    }

    /// Genre first, then author; the first failure wins.
    async fn check_references(&self, genre_id: i32, author_id: i32) -> AppResult<()> {
        if self.store.genres_get(genre_id).await?.is_none() {
            return Err(AppError::dangling_reference(EntityKind::Genre));
        }
        if self.store.authors_get(author_id).await?.is_none() {
            return Err(AppError::dangling_reference(EntityKind::Author));
        }
        Ok(())
    }

    async fn try_create(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        self.check_references(data.genre_id, data.author_id).await?;

        let book = self
            .store
            .books_create(&data.title, data.genre_id, data.author_id)
            .await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(book)
    }

    async fn try_update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        data.validate()?;

        if self.store.books_get(id).await?.is_none() {
            return Err(AppError::not_found(EntityKind::Book));
        }
        self.check_references(data.genre_id, data.author_id).await?;

        let book = self
            .store
            .books_update(id, &data.title, data.genre_id, data.author_id)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Book))?;
        tracing::info!("Updated book {} ({})", book.id, book.title);
        Ok(book)
    }

    async fn try_delete(&self, id: i32) -> AppResult<()> {
        if !self.store.books_delete(id).await? {
            return Err(AppError::not_found(EntityKind::Book));
        }
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}
