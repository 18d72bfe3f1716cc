//! Author queries on the PostgreSQL repository

use async_trait::async_trait;

use super::{name_write_error, referenced_delete_error, AuthorStore, Repository};
use crate::{
    error::AppResult,
    models::{Author, EntityKind},
};

#[async_trait]
impl AuthorStore for Repository {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn authors_get(&self, id: i32) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn authors_name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1 AND id != $2)")
                .bind(name)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    async fn authors_create(&self, name: &str) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("INSERT INTO authors (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| name_write_error(e, EntityKind::Author))
    }

    async fn authors_update(&self, id: i32, name: &str) -> AppResult<Option<Author>> {
        sqlx::query_as::<_, Author>("UPDATE authors SET name = $1 WHERE id = $2 RETURNING id, name")
            .bind(name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| name_write_error(e, EntityKind::Author))
    }

    async fn authors_delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| referenced_delete_error(e, EntityKind::Author))?;
        Ok(result.rows_affected() > 0)
    }
}
