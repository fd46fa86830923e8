//! Shared module - Common types and utilities
//!
//! This module contains types that are shared across all features:
//! the analyzed IR and source locations.

pub mod models;

// Re-exports for convenience
pub use models::*;
