//! Bookshelf catalog server
//!
//! A REST JSON API managing a catalog of books, authors, and genres, with
//! name uniqueness and referential integrity enforced before every write.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod response;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use response::ApiResponse;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
