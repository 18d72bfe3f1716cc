//! Business logic services

pub mod authors;
pub mod books;
pub mod genres;

use std::sync::Arc;

use crate::{error::AppResult, repository::CatalogStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    store: Arc<dyn CatalogStore>,
    pub genres: genres::GenreService,
    pub authors: authors::AuthorService,
    pub books: books::BookService,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            genres: genres::GenreService::new(store.clone()),
            authors: authors::AuthorService::new(store.clone()),
            books: books::BookService::new(store.clone()),
            store,
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
