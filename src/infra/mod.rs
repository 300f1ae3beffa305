//! Infrastructure adapters: reference store and telemetry.

pub mod error;
pub mod memory;
pub mod telemetry;
