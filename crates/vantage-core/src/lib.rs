//! # Vantage Core
//!
//! Environment query engine: select world positions by filtering and scoring
//! a voxelized snapshot of a scene.
//!
//! The engine voxelizes a bounded region of a world (via [`gridscape`]) into
//! a grid of tagged cells, filters cells through a condition list (logical
//! AND, short-circuit), scores survivors through weighted criteria, and
//! returns the top candidates ranked by score. Results are cached per query
//! id for downstream consumers such as visualization.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use glam::Vec3;
//! use gridscape::{Bounds, ScriptedWorld};
//! use vantage_core::{
//!     Condition, ConditionKind, Criterion, CriterionKind, Engine,
//!     EnvironmentConfig, Params, Query,
//! };
//!
//! // A world with a wall to hide behind.
//! let mut world = ScriptedWorld::new("skirmish");
//! world.add_ground(
//!     "floor",
//!     Bounds::from_min_max(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(20.0, 0.0, 20.0)),
//! );
//! world.add_block(
//!     "wall",
//!     Bounds::from_min_max(Vec3::new(2.5, 0.0, -3.0), Vec3::new(3.5, 3.0, 3.0)),
//! );
//!
//! let engine = Engine::new(Arc::new(world));
//! engine
//!     .initialize_environment(
//!         &EnvironmentConfig::new().with_region(Vec3::new(0.0, 2.0, 0.0), Vec3::new(10.0, 4.0, 10.0)),
//!     )
//!     .expect("environment builds");
//!
//! // Walkable cells near the wall, ranked by cover from the east.
//! let query = Query::new("hide")
//!     .with_desired_count(3)
//!     .with_condition(Condition::new(
//!         ConditionKind::CustomProperty,
//!         Params::new()
//!             .with("propertyName", "isWalkable")
//!             .with("expectedValue", true),
//!     ))
//!     .with_criterion(Criterion::new(
//!         CriterionKind::CoverQuality,
//!         Params::new().with("eyeHeight", 0.5_f32),
//!         1.0,
//!     ));
//! let result = engine.perform_query(&query);
//! assert!(result.is_success());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the spatial substrate for callers assembling worlds.
pub use gridscape;

pub mod cache;
pub mod conditions;
pub mod engine;
pub mod environment;
pub mod error;
pub mod executor;
pub mod fingerprint;
pub mod params;
pub mod query;
pub mod scoring;
pub mod view;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use cache::ResultCache;
pub use engine::Engine;
pub use environment::{EnvironmentConfig, EnvironmentInfo, EnvironmentSnapshot};
pub use error::EqsError;
pub use params::Params;
pub use query::{
    AreaOfInterest, Condition, ConditionKind, Criterion, CriterionKind, DistanceMetric,
    LocationCandidate, Query, QueryContext, QueryResult, QueryStatus, ReferencePoint,
};
pub use view::QueryView;
