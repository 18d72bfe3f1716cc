//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book with its genre and author names attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub genre_id: i32,
    pub author_id: i32,
    /// Name of the referenced genre
    pub genre_name: String,
    /// Name of the referenced author
    pub author_name: String,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Book title must be between 1 and 200 characters"))]
    pub title: String,
    pub genre_id: i32,
    pub author_id: i32,
}

/// Update book request. Every field is required; genre and author are
/// re-validated even when unchanged.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Book title must be between 1 and 200 characters"))]
    pub title: String,
    pub genre_id: i32,
    pub author_id: i32,
}

/// Selection applied when listing books
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookFilter {
    All,
    Genre(i32),
    Author(i32),
}

impl BookFilter {
    /// Whether a book with the given references passes the filter
    pub fn matches(self, genre_id: i32, author_id: i32) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Genre(id) => genre_id == id,
            BookFilter::Author(id) => author_id == id,
        }
    }
}
