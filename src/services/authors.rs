//! Author service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Author, CreateAuthor, EntityKind, UpdateAuthor},
    repository::{AuthorStore, BookStore, CatalogStore},
    response::ApiResponse,
};

#[derive(Clone)]
pub struct AuthorService {
    store: Arc<dyn CatalogStore>,
}

impl AuthorService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> ApiResponse<Vec<Author>> {
        ApiResponse::from_result(
            self.store.authors_list().await,
            "Authors retrieved successfully",
            "Failed to retrieve authors",
        )
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResponse<Author> {
        ApiResponse::from_result(
            self.find(id).await,
            "Author retrieved successfully",
            "Failed to retrieve author",
        )
    }

    pub async fn create(&self, data: &CreateAuthor) -> ApiResponse<Author> {
        ApiResponse::from_result(
            self.try_create(data).await,
            "Author created successfully",
            "Failed to create author",
        )
    }

    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> ApiResponse<Author> {
        ApiResponse::from_result(
            self.try_update(id, data).await,
            "Author updated successfully",
            "Failed to update author",
        )
    }

    pub async fn delete(&self, id: i32) -> ApiResponse<()> {
        ApiResponse::from_outcome(
            self.try_delete(id).await,
            "Author deleted successfully",
            "Failed to delete author",
        )
    }

    async fn find(&self, id: i32) -> AppResult<Author> {
        self.store
            .authors_get(id)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Author))
    }

    async fn try_create(&self, data: &CreateAuthor) -> AppResult<Author> {
        data.validate()?;

        if self.store.authors_name_exists(&data.name, None).await? {
            return Err(AppError::duplicate_name(EntityKind::Author));
        }

        let author = self.store.authors_create(&data.name).await?;
        tracing::info!("Created author {} ({})", author.id, author.name);
        Ok(author)
    }

    async fn try_update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        data.validate()?;
        self.find(id).await?;

        if self.store.authors_name_exists(&data.name, Some(id)).await? {
            return Err(AppError::duplicate_name(EntityKind::Author));
        }

        // The row can vanish between the check and the write
        let author = self
            .store
            .authors_update(id, &data.name)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Author))?;
        tracing::info!("Updated author {} ({})", author.id, author.name);
        Ok(author)
    }

    async fn try_delete(&self, id: i32) -> AppResult<()> {
        self.find(id).await?;

        if self.store.books_count_by_author(id).await? > 0 {
            return Err(AppError::still_referenced(EntityKind::Author));
        }

        if !self.store.authors_delete(id).await? {
            return Err(AppError::not_found(EntityKind::Author));
        }
        tracing::info!("Deleted author {}", id);
        Ok(())
    }
}
