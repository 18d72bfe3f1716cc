//! Book queries on the PostgreSQL repository

use async_trait::async_trait;

use super::{map_constraint_error, BookStore, Repository, FK_BOOKS_AUTHOR, FK_BOOKS_GENRE};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, EntityKind},
};

/// Book columns joined with the referenced genre and author names.
/// Expects the book rows to be exposed as `b`.
const BOOK_JOIN: &str = r#"
    SELECT b.id, b.title, b.genre_id, b.author_id,
           g.name AS genre_name, a.name AS author_name
    FROM {books} b
    JOIN genres g ON g.id = b.genre_id
    JOIN authors a ON a.id = b.author_id
"#;

fn book_join(source: &str) -> String {
    BOOK_JOIN.replace("{books}", source)
}

/// Map a failed book write: a foreign key violation names the missing side
fn book_write_error(err: sqlx::Error) -> AppError {
    map_constraint_error(
        err,
        || AppError::Internal("Unexpected unique violation on books".to_string()),
        |constraint| match constraint {
            Some(FK_BOOKS_AUTHOR) => AppError::dangling_reference(EntityKind::Author),
            Some(FK_BOOKS_GENRE) => AppError::dangling_reference(EntityKind::Genre),
            other => AppError::Internal(format!(
                "Unexpected foreign key violation on books: {:?}",
                other
            )),
        },
    )
}

#[async_trait]
impl BookStore for Repository {
    async fn books_list(&self, filter: BookFilter) -> AppResult<Vec<Book>> {
        let base = book_join("books");
        let rows = match filter {
            BookFilter::All => {
                sqlx::query_as::<_, Book>(&format!("{} ORDER BY b.id", base))
                    .fetch_all(&self.pool)
                    .await?
            }
            BookFilter::Genre(genre_id) => {
                sqlx::query_as::<_, Book>(&format!("{} WHERE b.genre_id = $1 ORDER BY b.id", base))
                    .bind(genre_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            BookFilter::Author(author_id) => {
                sqlx::query_as::<_, Book>(&format!("{} WHERE b.author_id = $1 ORDER BY b.id", base))
                    .bind(author_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    async fn books_get(&self, id: i32) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = $1", book_join("books")))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn books_create(&self, title: &str, genre_id: i32, author_id: i32) -> AppResult<Book> {
        let query = format!(
            r#"
            WITH inserted AS (
                INSERT INTO books (title, genre_id, author_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            {}
            "#,
            book_join("inserted")
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(title)
            .bind(genre_id)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(book_write_error)
    }

    async fn books_update(
        &self,
        id: i32,
        title: &str,
        genre_id: i32,
        author_id: i32,
    ) -> AppResult<Option<Book>> {
        let query = format!(
            r#"
            WITH updated AS (
                UPDATE books SET title = $1, genre_id = $2, author_id = $3
                WHERE id = $4
                RETURNING *
            )
            {}
            "#,
            book_join("updated")
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(title)
            .bind(genre_id)
            .bind(author_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(book_write_error)
    }

    async fn books_delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn books_count_by_genre(&self, genre_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE genre_id = $1")
            .bind(genre_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn books_count_by_author(&self, author_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
