//! Snapshot storage for the recipe catalog.

use std::sync::RwLock;

use metrics::counter;
use tracing::debug;

use crate::domain::recipes::Recipe;

use super::METRIC_CACHE_INVALIDATE_TOTAL;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::snapshot";

#[derive(Debug, Default)]
struct Snapshot {
    recipes: Vec<Recipe>,
    // Distinguishes "never loaded / invalidated" from "store returned nothing".
    loaded: bool,
}

/// In-memory copy of the full recipe list, newest first.
///
/// The snapshot and its loaded flag live behind a single reader/writer lock:
/// [`get`](Self::get) and [`is_valid`](Self::is_valid) share it, while
/// [`set`](Self::set) and [`invalidate`](Self::invalidate) take it exclusively.
/// Nothing here touches the store, so no operation can fail.
#[derive(Debug, Default)]
pub struct RecipeCache {
    snapshot: RwLock<Snapshot>,
}

impl RecipeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the snapshot scoped to the caller's role.
    ///
    /// Admins see every recipe; everyone else sees only moderated ones. An
    /// unloaded cache yields an empty list.
    pub fn get(&self, is_admin: bool) -> Vec<Recipe> {
        self.lookup(is_admin).unwrap_or_default()
    }

    /// Like [`get`](Self::get), but reports an unloaded cache as `None`.
    ///
    /// The loaded check and the copy happen under one read lock, so a
    /// concurrent invalidation cannot turn a hit into an empty result.
    pub fn lookup(&self, is_admin: bool) -> Option<Vec<Recipe>> {
        let snapshot = rw_read(&self.snapshot, SOURCE, "lookup");
        if !snapshot.loaded {
            return None;
        }
        let recipes = visible_to(&snapshot.recipes, is_admin);
        debug!(count = recipes.len(), is_admin, "Read recipes from cache");
        Some(recipes)
    }

    /// Replace the snapshot and mark the cache as loaded.
    pub fn set(&self, recipes: Vec<Recipe>) {
        let count = recipes.len();
        {
            let mut snapshot = rw_write(&self.snapshot, SOURCE, "set");
            snapshot.recipes = recipes;
            snapshot.loaded = true;
        }
        debug!(count, "Put recipes into cache");
    }

    /// Drop the snapshot so the next read reloads from the store.
    pub fn invalidate(&self) {
        {
            let mut snapshot = rw_write(&self.snapshot, SOURCE, "invalidate");
            snapshot.recipes = Vec::new();
            snapshot.loaded = false;
        }
        counter!(METRIC_CACHE_INVALIDATE_TOTAL).increment(1);
        debug!("Invalidated recipe cache");
    }

    pub fn is_valid(&self) -> bool {
        rw_read(&self.snapshot, SOURCE, "is_valid").loaded
    }
}

/// Copy the recipes a caller with the given role may see, preserving order.
pub fn visible_to(recipes: &[Recipe], is_admin: bool) -> Vec<Recipe> {
    if is_admin {
        return recipes.to_vec();
    }
    recipes
        .iter()
        .filter(|recipe| !recipe.pending)
        .cloned()
        .collect()
}
