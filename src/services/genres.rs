//! Genre service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{CreateGenre, EntityKind, Genre, UpdateGenre},
    repository::{BookStore, CatalogStore, GenreStore},
    response::ApiResponse,
};

#[derive(Clone)]
pub struct GenreService {
    store: Arc<dyn CatalogStore>,
}

impl GenreService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> ApiResponse<Vec<Genre>> {
        ApiResponse::from_result(
            self.store.genres_list().await,
            "Genres retrieved successfully",
            "Failed to retrieve genres",
        )
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResponse<Genre> {
        ApiResponse::from_result(
            self.find(id).await,
            "Genre retrieved successfully",
            "Failed to retrieve genre",
        )
    }

    pub async fn create(&self, data: &CreateGenre) -> ApiResponse<Genre> {
        ApiResponse::from_result(
            self.try_create(data).await,
            "Genre created successfully",
            "Failed to create genre",
        )
    }

    pub async fn update(&self, id: i32, data: &UpdateGenre) -> ApiResponse<Genre> {
        ApiResponse::from_result(
            self.try_update(id, data).await,
            "Genre updated successfully",
            "Failed to update genre",
        )
    }

    pub async fn delete(&self, id: i32) -> ApiResponse<()> {
        ApiResponse::from_outcome(
            self.try_delete(id).await,
            "Genre deleted successfully",
            "Failed to delete genre",
        )
    }

    async fn find(&self, id: i32) -> AppResult<Genre> {
        self.store
            .genres_get(id)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Genre))
    }

    async fn try_create(&self, data: &CreateGenre) -> AppResult<Genre> {
        data.validate()?;

        if self.store.genres_name_exists(&data.name, None).await? {
            return Err(AppError::duplicate_name(EntityKind::Genre));
        }

        let genre = self.store.genres_create(&data.name).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    async fn try_update(&self, id: i32, data: &UpdateGenre) -> AppResult<Genre> {
        data.validate()?;
        self.find(id).await?;

        if self.store.genres_name_exists(&data.name, Some(id)).await? {
            return Err(AppError::duplicate_name(EntityKind::Genre));
        }

        // The row can vanish between the check and the write
        let genre = self
            .store
            .genres_update(id, &data.name)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Genre))?;
        tracing::info!("Updated genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    async fn try_delete(&self, id: i32) -> AppResult<()> {
        self.find(id).await?;

        if self.store.books_count_by_genre(id).await? > 0 {
            return Err(AppError::still_referenced(EntityKind::Genre));
        }

        if !self.store.genres_delete(id).await? {
            return Err(AppError::not_found(EntityKind::Genre));
        }
        tracing::info!("Deleted genre {}", id);
        Ok(())
    }
}
