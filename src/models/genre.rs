//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Genre record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    /// Unique genre name (case-sensitive)
    pub name: String,
}

/// Create genre request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGenre {
    #[validate(length(min = 1, max = 100, message = "Genre name must be between 1 and 100 characters"))]
    pub name: String,
}

/// Update genre request (full replace)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateGenre {
    #[validate(length(min = 1, max = 100, message = "Genre name must be between 1 and 100 characters"))]
    pub name: String,
}
