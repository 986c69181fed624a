//! # Gridscape
//!
//! Uniform voxel-grid substrate for spatial environment queries.
//!
//! Gridscape converts a bounded 3D region of a world into a uniform grid of
//! cells, each tagged with static occupancy, nearby dynamic occupants, and an
//! open property bag. It also defines the world-snapshot primitives (static
//! geometry, dynamic objects, collision layers) and the [`WorldSource`] trait
//! through which a host engine exposes ray and overlap queries against a
//! frozen world state.
//!
//! ## Quick Start
//!
//! ```rust
//! use glam::Vec3;
//! use gridscape::{Bounds, Grid, GridConfig, ScriptedWorld, WorldSource};
//!
//! // Describe a small world: one wall in an otherwise open field.
//! let mut world = ScriptedWorld::new("demo");
//! world.add_block(
//!     "wall",
//!     Bounds::from_center_size(Vec3::new(2.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 4.0)),
//! );
//!
//! // Voxelize a 10x4x10 region around the origin into 1-unit cells.
//! let config = GridConfig::new()
//!     .with_region(Vec3::ZERO, Vec3::new(10.0, 4.0, 10.0))
//!     .with_cell_size(1.0);
//! let grid = Grid::build(&config, world.static_geometry(), &world.dynamic_objects(None)).unwrap();
//!
//! assert_eq!(grid.cell_count(), 10 * 4 * 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod coord;
pub mod grid;
pub mod value;
pub mod world;

// Re-exports for convenience
pub use coord::{CellCoord, GridDims};
pub use grid::{Cell, Grid, GridConfig, GridError, GridStats};
pub use value::Value;
pub use world::{
    DynamicObject, LayerMask, ObjectId, RayHit, ScriptedWorld, StaticGeometry, WorldSource,
};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: glam::Vec3,
    /// Maximum corner
    pub max: glam::Vec3,
}

impl Bounds {
    /// Create bounds from min/max corners.
    #[must_use]
    pub fn from_min_max(min: glam::Vec3, max: glam::Vec3) -> Self {
        Self { min, max }
    }

    /// Create bounds from a center point and full extents.
    #[must_use]
    pub fn from_center_size(center: glam::Vec3, size: glam::Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> glam::Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> glam::Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds.
    #[must_use]
    pub fn contains(&self, point: glam::Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Get the point on or inside the bounds closest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: glam::Vec3) -> glam::Vec3 {
        glam::Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Distance from a point to the surface of the bounds (0 if inside).
    #[must_use]
    pub fn distance_to_point(&self, point: glam::Vec3) -> f32 {
        point.distance(self.closest_point(point))
    }

    /// Check if this bounds intersects a sphere.
    #[must_use]
    pub fn intersects_sphere(&self, center: glam::Vec3, radius: f32) -> bool {
        center.distance_squared(self.closest_point(center)) <= radius * radius
    }

    /// Intersect a ray with the bounds using the slab method.
    ///
    /// `dir` must be normalized. Returns the distance along the ray to the
    /// entry point (0.0 when the origin is already inside), or `None` when
    /// the ray misses or the entry lies beyond `max_dist`.
    #[must_use]
    pub fn ray_intersect(&self, origin: glam::Vec3, dir: glam::Vec3, max_dist: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_dist;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d.abs() < f32::EPSILON {
                // Ray parallel to the slab: miss unless origin is within it.
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
            } else {
                let inv = 1.0 / d;
                let mut t0 = (self.min[axis] - o) * inv;
                let mut t1 = (self.max[axis] - o) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::splat(10.0));
        assert!(bounds.contains(Vec3::ZERO));
        assert!(bounds.contains(Vec3::new(4.0, 4.0, 4.0)));
        assert!(!bounds.contains(Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_bounds_closest_point() {
        let bounds = Bounds::from_min_max(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(bounds.closest_point(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(bounds.closest_point(Vec3::new(5.0, 1.0, -3.0)), Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(bounds.distance_to_point(Vec3::new(4.0, 1.0, 1.0)), 2.0);
    }

    #[test]
    fn test_bounds_sphere_intersection() {
        let bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        assert!(bounds.intersects_sphere(Vec3::new(2.0, 0.0, 0.0), 1.5));
        assert!(!bounds.intersects_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_ray_hits_box() {
        let bounds = Bounds::from_center_size(Vec3::new(5.0, 0.0, 0.0), Vec3::splat(2.0));
        let hit = bounds.ray_intersect(Vec3::ZERO, Vec3::X, 100.0);
        assert!(hit.is_some());
        assert!((hit.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_box() {
        let bounds = Bounds::from_center_size(Vec3::new(5.0, 0.0, 0.0), Vec3::splat(2.0));
        assert!(bounds.ray_intersect(Vec3::ZERO, Vec3::Y, 100.0).is_none());
        // Entry point beyond max distance is a miss.
        assert!(bounds.ray_intersect(Vec3::ZERO, Vec3::X, 3.0).is_none());
    }

    #[test]
    fn test_ray_from_inside() {
        let bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::splat(4.0));
        let hit = bounds.ray_intersect(Vec3::ZERO, Vec3::X, 100.0);
        assert_eq!(hit, Some(0.0));
    }

    #[test]
    fn test_parallel_ray_inside_slab() {
        let bounds = Bounds::from_min_max(Vec3::new(2.0, -1.0, -1.0), Vec3::new(4.0, 1.0, 1.0));
        // Ray along X at y=0, z=0 stays inside the Y and Z slabs.
        assert!(bounds.ray_intersect(Vec3::ZERO, Vec3::X, 100.0).is_some());
        // Ray along X at y=5 is outside the Y slab for its whole length.
        assert!(bounds
            .ray_intersect(Vec3::new(0.0, 5.0, 0.0), Vec3::X, 100.0)
            .is_none());
    }
}
