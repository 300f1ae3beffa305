//! Pantry: the recipe query and cache layer of a moderated recipe catalog.
//!
//! [`application::recipes::RecipeQueryService`] is the entry point. It keeps a
//! snapshot of every recipe in a [`cache::RecipeCache`], scopes reads by role,
//! applies free-text search and offset pagination, and invalidates the
//! snapshot before forwarding any write to the [`application::repos::RecipesRepo`].

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
