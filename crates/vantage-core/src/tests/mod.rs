//! Test module for the query engine.
//!
//! - `helpers.rs`: world fixtures and setup utilities shared by the
//!   per-module unit tests and the suites below
//! - `integration.rs`: end-to-end scenarios through [`Engine`](crate::Engine)
//! - `determinism.rs`: reproducibility of hashing, sampling, and ranking
//! - `properties.rs`: property tests (score boundedness, filter
//!   monotonicity, weighted-mean edge cases)

mod helpers;
mod properties;

// Re-export for convenience
pub use helpers::*;
