//! Pantry recipe cache.
//!
//! Holds one in-memory snapshot of every recipe, pending ones included, and
//! answers role-scoped reads from it until the snapshot is invalidated.

mod lock;
mod snapshot;

pub use snapshot::{RecipeCache, visible_to};

pub const METRIC_CACHE_HIT_TOTAL: &str = "pantry_cache_hit_total";
pub const METRIC_CACHE_MISS_TOTAL: &str = "pantry_cache_miss_total";
pub const METRIC_CACHE_INVALIDATE_TOTAL: &str = "pantry_cache_invalidate_total";
pub const METRIC_STORE_LOAD_MS: &str = "pantry_store_load_ms";
