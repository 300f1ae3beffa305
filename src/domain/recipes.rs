//! Recipe records as held by the store and the in-memory catalog snapshot.

use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// `id` is assigned by the store on creation and never changes afterwards. The
/// timestamp fields are opaque strings owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub author: String,
    pub source: String,
    /// Preparation time in minutes, zero when unknown.
    pub duration: u32,
    pub ingredients: String,
    pub instructions: String,
    /// Raw comma-separated tag list, see [`Recipe::parse_tags`].
    pub tags: String,
    /// Awaiting moderation; hidden from non-admin callers.
    pub pending: bool,
    pub created_at: String,
    pub last_modified_at: String,
}

impl Recipe {
    /// Split the raw tag string into trimmed, non-empty tags in the order they were written.
    pub fn parse_tags(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Case-insensitive substring match against title, description, author and tags.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_query(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
            || contains_folded(&self.description, needle)
            || contains_folded(&self.author, needle)
            || self
                .parse_tags()
                .iter()
                .any(|tag| contains_folded(tag, needle))
    }

    pub fn link(&self) -> RecipeLink {
        RecipeLink {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Fields supplied by a caller when creating a recipe; the store assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub author: String,
    pub source: String,
    pub duration: u32,
    pub ingredients: String,
    pub instructions: String,
    pub tags: String,
    pub pending: bool,
}

impl NewRecipe {
    pub fn into_recipe(self, id: u64, stamp: &str) -> Recipe {
        Recipe {
            id,
            title: self.title,
            description: self.description,
            author: self.author,
            source: self.source,
            duration: self.duration,
            ingredients: self.ingredients,
            instructions: self.instructions,
            tags: self.tags,
            pending: self.pending,
            created_at: stamp.to_string(),
            last_modified_at: stamp.to_string(),
        }
    }
}

/// Minimal projection used by link pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeLink {
    pub id: u64,
    pub title: String,
}
