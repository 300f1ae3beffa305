//! Application services layer.

pub mod error;
pub mod options;
pub mod pagination;
pub mod recipes;
pub mod repos;
