//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recipes::{NewRecipe, Recipe};

/// Failures a recipe store may report. The query layer passes these through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("recipe `{id}` not found")]
    NotFound { id: u64 },
    #[error("store failure: {message}")]
    StoreFailure { message: String },
}

impl RepoError {
    pub fn not_found(id: u64) -> Self {
        Self::NotFound { id }
    }

    pub fn store_failure(message: impl Into<String>) -> Self {
        Self::StoreFailure {
            message: message.into(),
        }
    }

    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::store_failure(err.to_string())
    }
}

/// Durable recipe persistence.
#[async_trait]
pub trait RecipesRepo: Send + Sync {
    /// Every recipe, pending ones included, ordered by descending id.
    async fn load_all(&self) -> Result<Vec<Recipe>, RepoError>;

    async fn find_by_id(&self, id: u64) -> Result<Recipe, RepoError>;

    /// Persist a new recipe and return it with its assigned id.
    async fn create(&self, params: NewRecipe) -> Result<Recipe, RepoError>;

    /// Overwrite an existing recipe identified by `recipe.id`.
    async fn update(&self, recipe: Recipe) -> Result<Recipe, RepoError>;

    async fn delete(&self, id: u64) -> Result<(), RepoError>;

    async fn set_pending(&self, id: u64, pending: bool) -> Result<(), RepoError>;
}
