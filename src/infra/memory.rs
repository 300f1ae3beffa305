//! In-process recipe store used by the CLI and by tests.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::repos::{RecipesRepo, RepoError};
use crate::domain::recipes::{NewRecipe, Recipe};

use super::error::InfraError;

const ID_SPACE_EXHAUSTED: &str = "recipe id space exhausted";

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    recipes: BTreeMap<u64, Recipe>,
}

/// Recipe store backed by an ordered map.
///
/// Ids are handed out monotonically and never reused, even after deletes.
#[derive(Debug)]
pub struct InMemoryRecipeStore {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

impl Default for InMemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                recipes: BTreeMap::new(),
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Seed the store with existing recipes. Recipes with id `0` get a fresh id.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Result<Self, InfraError> {
        let mut state = State::default();
        let mut unassigned = Vec::new();
        for recipe in recipes {
            if recipe.id == 0 {
                unassigned.push(recipe);
                continue;
            }
            let id = recipe.id;
            if state.recipes.insert(id, recipe).is_some() {
                return Err(InfraError::seed(format!("duplicate recipe id {id}")));
            }
        }
        state.next_id = match state.recipes.keys().next_back() {
            Some(highest) => highest
                .checked_add(1)
                .ok_or_else(|| InfraError::seed(ID_SPACE_EXHAUSTED))?,
            None => 1,
        };
        for mut recipe in unassigned {
            recipe.id = state.next_id;
            state.next_id = state
                .next_id
                .checked_add(1)
                .ok_or_else(|| InfraError::seed(ID_SPACE_EXHAUSTED))?;
            state.recipes.insert(recipe.id, recipe);
        }

        Ok(Self {
            state: RwLock::new(state),
            unavailable: AtomicBool::new(false),
        })
    }

    /// Load seed recipes from a JSON array on disk.
    pub async fn from_seed_file(path: &Path) -> Result<Self, InfraError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let recipes: Vec<Recipe> = serde_json::from_str(&raw).map_err(|err| {
            InfraError::seed(format!("failed to parse `{}`: {err}", path.display()))
        })?;
        debug!(count = recipes.len(), path = %path.display(), "Loaded seed recipes");
        Self::from_recipes(recipes)
    }

    /// Make every subsequent call fail with a store failure until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), RepoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepoError::store_failure("recipe store unavailable"));
        }
        Ok(())
    }
}

fn timestamp() -> Result<String, RepoError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(RepoError::from_persistence)
}

#[async_trait]
impl RecipesRepo for InMemoryRecipeStore {
    async fn load_all(&self) -> Result<Vec<Recipe>, RepoError> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.recipes.values().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Recipe, RepoError> {
        self.ensure_available()?;
        let state = self.state.read().await;
        state
            .recipes
            .get(&id)
            .cloned()
            .ok_or(RepoError::not_found(id))
    }

    async fn create(&self, params: NewRecipe) -> Result<Recipe, RepoError> {
        self.ensure_available()?;
        let stamp = timestamp()?;
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| RepoError::store_failure(ID_SPACE_EXHAUSTED))?;
        let recipe = params.into_recipe(id, &stamp);
        state.recipes.insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, mut recipe: Recipe) -> Result<Recipe, RepoError> {
        self.ensure_available()?;
        let stamp = timestamp()?;
        let mut state = self.state.write().await;
        let stored = state
            .recipes
            .get_mut(&recipe.id)
            .ok_or(RepoError::not_found(recipe.id))?;
        recipe.created_at = stored.created_at.clone();
        recipe.last_modified_at = stamp;
        *stored = recipe.clone();
        Ok(recipe)
    }

    async fn delete(&self, id: u64) -> Result<(), RepoError> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        state
            .recipes
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::not_found(id))
    }

    async fn set_pending(&self, id: u64, pending: bool) -> Result<(), RepoError> {
        self.ensure_available()?;
        let stamp = timestamp()?;
        let mut state = self.state.write().await;
        let stored = state
            .recipes
            .get_mut(&id)
            .ok_or(RepoError::not_found(id))?;
        stored.pending = pending;
        stored.last_modified_at = stamp;
        Ok(())
    }
}
