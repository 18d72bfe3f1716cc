//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod genres;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookFilter, EntityKind, Genre},
};

pub use memory::MemoryStore;

/// Genre persistence
#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn genres_list(&self) -> AppResult<Vec<Genre>>;
    async fn genres_get(&self, id: i32) -> AppResult<Option<Genre>>;
    /// Whether a genre other than `exclude_id` already uses `name`
    async fn genres_name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn genres_create(&self, name: &str) -> AppResult<Genre>;
    async fn genres_update(&self, id: i32, name: &str) -> AppResult<Option<Genre>>;
    /// Returns false when no row matched
    async fn genres_delete(&self, id: i32) -> AppResult<bool>;
}

/// Author persistence
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_get(&self, id: i32) -> AppResult<Option<Author>>;
    /// Whether an author other than `exclude_id` already uses `name`
    async fn authors_name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn authors_create(&self, name: &str) -> AppResult<Author>;
    async fn authors_update(&self, id: i32, name: &str) -> AppResult<Option<Author>>;
    /// Returns false when no row matched
    async fn authors_delete(&self, id: i32) -> AppResult<bool>;
}

/// Book persistence. Reads return books with genre and author names joined.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn books_list(&self, filter: BookFilter) -> AppResult<Vec<Book>>;
    async fn books_get(&self, id: i32) -> AppResult<Option<Book>>;
    async fn books_create(&self, title: &str, genre_id: i32, author_id: i32) -> AppResult<Book>;
    async fn books_update(
        &self,
        id: i32,
        title: &str,
        genre_id: i32,
        author_id: i32,
    ) -> AppResult<Option<Book>>;
    /// Returns false when no row matched
    async fn books_delete(&self, id: i32) -> AppResult<bool>;
    async fn books_count_by_genre(&self, genre_id: i32) -> AppResult<i64>;
    async fn books_count_by_author(&self, author_id: i32) -> AppResult<i64>;
}

/// Full catalog store as used by the services.
///
/// Implementations enforce name uniqueness and restrictive foreign keys
/// themselves and report violations as the matching `AppError` variant.
#[async_trait]
pub trait CatalogStore: GenreStore + AuthorStore + BookStore {
    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Constraint names declared in the migrations
pub(crate) const FK_BOOKS_GENRE: &str = "fk_books_genre";
pub(crate) const FK_BOOKS_AUTHOR: &str = "fk_books_author";

/// Translate a constraint violation raised by the database into a domain
/// error. Concurrent requests can slip past the application-level checks, so
/// the database constraints have the final word.
pub(crate) fn map_constraint_error(
    err: sqlx::Error,
    on_unique: impl FnOnce() -> AppError,
    on_foreign_key: impl FnOnce(Option<&str>) -> AppError,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return on_unique();
        }
        if db_err.is_foreign_key_violation() {
            return on_foreign_key(db_err.constraint());
        }
    }
    AppError::Database(err)
}

/// Map a failed genre/author insert or rename
pub(crate) fn name_write_error(err: sqlx::Error, entity: EntityKind) -> AppError {
    map_constraint_error(
        err,
        || AppError::duplicate_name(entity),
        |constraint| {
            AppError::Internal(format!(
                "Unexpected foreign key violation on {}: {:?}",
                entity.label(),
                constraint
            ))
        },
    )
}

/// Map a failed genre/author delete: remaining books block it
pub(crate) fn referenced_delete_error(err: sqlx::Error, entity: EntityKind) -> AppError {
    map_constraint_error(
        err,
        || AppError::Internal(format!("Unexpected unique violation deleting {}", entity.label())),
        |_| AppError::still_referenced(entity),
    )
}

#[cfg(test)]
pub(crate) mod mock {
    use std::{error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind as DbErrorKind};

    use super::*;

    /// Constraint violation as reported by the database driver
    #[derive(Debug)]
    pub struct ConstraintViolation {
        pub kind: DbErrorKind,
        pub constraint: Option<&'static str>,
    }

    impl ConstraintViolation {
        pub fn unique(constraint: &'static str) -> sqlx::Error {
            Self::error(DbErrorKind::UniqueViolation, Some(constraint))
        }

        pub fn foreign_key(constraint: &'static str) -> sqlx::Error {
            Self::error(DbErrorKind::ForeignKeyViolation, Some(constraint))
        }

        pub fn error(kind: DbErrorKind, constraint: Option<&'static str>) -> sqlx::Error {
            sqlx::Error::Database(Box::new(Self { kind, constraint }))
        }
    }

    impl fmt::Display for ConstraintViolation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violation on {:?}", self.constraint)
        }
    }

    impl StdError for ConstraintViolation {}

    impl DatabaseError for ConstraintViolation {
        fn message(&self) -> &str {
            "constraint violation"
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> DbErrorKind {
            match self.kind {
                DbErrorKind::UniqueViolation => DbErrorKind::UniqueViolation,
                DbErrorKind::ForeignKeyViolation => DbErrorKind::ForeignKeyViolation,
                DbErrorKind::NotNullViolation => DbErrorKind::NotNullViolation,
                DbErrorKind::CheckViolation => DbErrorKind::CheckViolation,
                _ => DbErrorKind::Other,
            }
        }
    }

    mockall::mock! {
        pub Store {}

        #[async_trait]
        impl GenreStore for Store {
            async fn genres_list(&self) -> AppResult<Vec<Genre>>;
            async fn genres_get(&self, id: i32) -> AppResult<Option<Genre>>;
            async fn genres_name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool>;
            async fn genres_create(&self, name: &str) -> AppResult<Genre>;
            async fn genres_update(&self, id: i32, name: &str) -> AppResult<Option<Genre>>;
            async fn genres_delete(&self, id: i32) -> AppResult<bool>;
        }

        #[async_trait]
        impl AuthorStore for Store {
            async fn authors_list(&self) -> AppResult<Vec<Author>>;
            async fn authors_get(&self, id: i32) -> AppResult<Option<Author>>;
            async fn authors_name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool>;
            async fn authors_create(&self, name: &str) -> AppResult<Author>;
            async fn authors_update(&self, id: i32, name: &str) -> AppResult<Option<Author>>;
            async fn authors_delete(&self, id: i32) -> AppResult<bool>;
        }

        #[async_trait]
        impl BookStore for Store {
            async fn books_list(&self, filter: BookFilter) -> AppResult<Vec<Book>>;
            async fn books_get(&self, id: i32) -> AppResult<Option<Book>>;
            async fn books_create(&self, title: &str, genre_id: i32, author_id: i32) -> AppResult<Book>;
            async fn books_update(&self, id: i32, title: &str, genre_id: i32, author_id: i32) -> AppResult<Option<Book>>;
            async fn books_delete(&self, id: i32) -> AppResult<bool>;
            async fn books_count_by_genre(&self, genre_id: i32) -> AppResult<i64>;
            async fn books_count_by_author(&self, author_id: i32) -> AppResult<i64>;
        }

        #[async_trait]
        impl CatalogStore for Store {
            async fn ping(&self) -> AppResult<()>;
        }
    }
}
