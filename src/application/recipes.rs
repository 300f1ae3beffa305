//! Recipe query service: role-scoped reads through the snapshot cache,
//! free-text search, pagination, and invalidate-then-write mutations.
//!
//! Two concurrent cache misses may both call [`RecipesRepo::load_all`]; the
//! later install overwrites the earlier one with equivalent data. Likewise a
//! read that lands between a write's invalidation and the store completing
//! it can reinstall pre-write data until the next mutation. Both windows are
//! accepted rather than coordinated.
//!
//! ## Configuration
//!
//! Page size defaults and the store call bound come from `pantry.toml`:
//!
//! ```toml
//! [catalog]
//! default_page_size = 10
//! store_timeout_ms = 5000
//! ```

use std::{future::Future, sync::Arc, time::Duration, time::Instant};

use metrics::{counter, histogram};
use tracing::{debug, instrument, warn};

use crate::application::options::ReadRecipesOptions;
use crate::application::pagination::{Page, paginate};
use crate::application::repos::{RecipesRepo, RepoError};
use crate::cache::{
    METRIC_CACHE_HIT_TOTAL, METRIC_CACHE_MISS_TOTAL, METRIC_STORE_LOAD_MS, RecipeCache,
    visible_to,
};
use crate::domain::recipes::{NewRecipe, Recipe, RecipeLink};

pub type RecipePage = Page<Recipe>;

#[derive(Clone)]
pub struct RecipeQueryService {
    store: Arc<dyn RecipesRepo>,
    cache: Arc<RecipeCache>,
    store_timeout: Option<Duration>,
}

impl RecipeQueryService {
    pub fn new(store: Arc<dyn RecipesRepo>) -> Self {
        Self {
            store,
            cache: Arc::new(RecipeCache::new()),
            store_timeout: None,
        }
    }

    /// Bound every store call; an expired call surfaces as a store failure.
    pub fn with_store_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn cache(&self) -> &RecipeCache {
        &self.cache
    }

    /// List one page of recipes visible to the caller, optionally filtered by `query`.
    #[instrument(skip(self), fields(is_admin = options.is_admin, page = options.page))]
    pub async fn read_recipes(
        &self,
        options: &ReadRecipesOptions,
    ) -> Result<RecipePage, RepoError> {
        if !options.has_valid_window() {
            debug!(
                page = options.page,
                page_size = options.page_size,
                "Ignoring malformed pagination window"
            );
            return Ok(RecipePage::default());
        }

        let recipes = self.read_all_recipes(options.is_admin).await?;
        let filtered = filter_recipes(recipes, &options.query);
        Ok(paginate(filtered, options.page, options.page_size))
    }

    /// Every recipe visible to the caller, newest first.
    #[instrument(skip(self))]
    pub async fn read_all_recipes(&self, is_admin: bool) -> Result<Vec<Recipe>, RepoError> {
        if let Some(recipes) = self.cache.lookup(is_admin) {
            counter!(METRIC_CACHE_HIT_TOTAL).increment(1);
            return Ok(recipes);
        }
        counter!(METRIC_CACHE_MISS_TOTAL).increment(1);

        let started_at = Instant::now();
        let recipes = self
            .call_store("load_all", self.store.load_all())
            .await
            .inspect_err(|err| warn!(error = %err, "Failed to load recipes from store"))?;
        histogram!(METRIC_STORE_LOAD_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        // Scope the loaded list directly so a concurrent invalidation between
        // install and read cannot hand this caller an empty result.
        let visible = visible_to(&recipes, is_admin);
        self.cache.set(recipes);
        Ok(visible)
    }

    /// Single recipe straight from the store, bypassing the snapshot.
    pub async fn read_recipe(&self, id: u64) -> Result<Recipe, RepoError> {
        self.call_store("find_by_id", self.store.find_by_id(id)).await
    }

    /// Link data for recipes matching `query`. Pending recipes are never linked.
    pub async fn recipe_links(
        &self,
        is_admin: bool,
        query: &str,
    ) -> Result<Vec<RecipeLink>, RepoError> {
        let recipes = self.read_all_recipes(is_admin).await?;
        Ok(filter_recipes(recipes, query)
            .iter()
            .filter(|recipe| !recipe.pending)
            .map(Recipe::link)
            .collect())
    }

    pub async fn create_recipe(&self, params: NewRecipe) -> Result<Recipe, RepoError> {
        self.cache.invalidate();
        let recipe = self.call_store("create", self.store.create(params)).await?;
        debug!(id = recipe.id, "Created recipe");
        Ok(recipe)
    }

    pub async fn update_recipe(&self, recipe: Recipe) -> Result<Recipe, RepoError> {
        self.cache.invalidate();
        self.call_store("update", self.store.update(recipe)).await
    }

    pub async fn delete_recipe(&self, id: u64) -> Result<(), RepoError> {
        self.cache.invalidate();
        self.call_store("delete", self.store.delete(id)).await
    }

    pub async fn set_pending(&self, id: u64, pending: bool) -> Result<(), RepoError> {
        self.cache.invalidate();
        self.call_store("set_pending", self.store.set_pending(id, pending))
            .await
    }

    async fn call_store<T, F>(&self, op: &'static str, call: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        let Some(limit) = self.store_timeout else {
            return call.await;
        };
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, ?limit, "Store call timed out");
                Err(RepoError::store_failure(format!(
                    "store call `{op}` timed out after {}ms",
                    limit.as_millis()
                )))
            }
        }
    }
}

/// Keep recipes whose title, description, author or tags contain `query`,
/// ignoring case. A blank query keeps everything.
pub fn filter_recipes(recipes: Vec<Recipe>, query: &str) -> Vec<Recipe> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return recipes;
    }
    recipes
        .into_iter()
        .filter(|recipe| recipe.matches_query(&needle))
        .collect()
}
