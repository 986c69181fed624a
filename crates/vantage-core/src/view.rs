//! Read-only evaluation view for condition and scoring evaluators.
//!
//! A [`QueryView`] bundles everything an evaluator may read during one query
//! execution: the frozen snapshot, the world's physics queries, and the query
//! itself. Evaluators get no mutable access to anything — all side output
//! flows through return values, which keeps per-cell evaluation safe to run
//! in parallel.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec3;

use gridscape::{Bounds, Cell, Grid, LayerMask, ObjectId, RayHit, WorldSource};

use crate::environment::EnvironmentSnapshot;
use crate::params::Params;
use crate::query::Query;

/// The shape a target object resolves to for spatial relation tests.
#[derive(Debug, Clone, Copy)]
pub enum TargetShape {
    /// Axis-aligned box (static geometry)
    Boxed(Bounds),
    /// Sphere (dynamic object body)
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
}

impl TargetShape {
    /// Whether a point is inside the shape.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        match self {
            Self::Boxed(bounds) => bounds.contains(point),
            Self::Sphere { center, radius } => center.distance(point) <= *radius,
        }
    }

    /// Distance from a point to the shape surface (0 when inside).
    #[must_use]
    pub fn surface_distance(&self, point: Vec3) -> f32 {
        match self {
            Self::Boxed(bounds) => bounds.distance_to_point(point),
            Self::Sphere { center, radius } => (center.distance(point) - radius).max(0.0),
        }
    }
}

/// A resolved target object: its id, shape, and trigger flag.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedObject {
    /// Object id
    pub id: ObjectId,
    /// Collision shape
    pub shape: TargetShape,
    /// Whether the object sits on the trigger layer
    pub is_trigger: bool,
}

/// Scoped read-only view over one query execution.
pub struct QueryView<'a> {
    snapshot: &'a EnvironmentSnapshot,
    world: &'a dyn WorldSource,
    query: &'a Query,
}

impl<'a> QueryView<'a> {
    /// Create a view for one execution.
    #[must_use]
    pub fn new(
        snapshot: &'a EnvironmentSnapshot,
        world: &'a dyn WorldSource,
        query: &'a Query,
    ) -> Self {
        Self {
            snapshot,
            world,
            query,
        }
    }

    /// The snapshot's grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.snapshot.grid
    }

    /// The frozen snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &EnvironmentSnapshot {
        self.snapshot
    }

    /// The query being executed.
    #[must_use]
    pub fn query(&self) -> &Query {
        self.query
    }

    /// Cast a ray against the world.
    #[must_use]
    pub fn raycast(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        self.world.raycast(origin, dir, max_dist, mask)
    }

    /// Whether any obstacle on the given layers overlaps a sphere.
    #[must_use]
    pub fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        self.world.check_sphere(center, radius, mask)
    }

    /// Resolve a point parameter against the query context.
    #[must_use]
    pub fn resolve_point(&self, params: &Params, key: &str) -> Option<Vec3> {
        self.query.context.resolve_point(params, key)
    }

    /// Parse a layer mask from a parameter bag (`layers` key), defaulting to
    /// the common obstacle layers.
    #[must_use]
    pub fn layer_mask(&self, params: &Params) -> LayerMask {
        let names = params.get_str_list("layers");
        if names.is_empty() {
            LayerMask::default()
        } else {
            LayerMask::from_names(names)
        }
    }

    /// Resolve a target object by `objectId` or `objectName` parameter.
    ///
    /// Searches captured static geometry first, then dynamic objects.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn resolve_object(&self, params: &Params) -> Option<ResolvedObject> {
        let by_id = params
            .get("objectId")
            .and_then(gridscape::Value::as_i64)
            .map(|raw| ObjectId::new(raw as u64));
        let by_name = params.get_str("objectName");

        let matches_static = |geo: &&gridscape::StaticGeometry| {
            by_id.map_or(false, |id| geo.id == id) || by_name.map_or(false, |n| geo.name == n)
        };
        if let Some(geo) = self.snapshot.static_geometry.iter().find(matches_static) {
            return Some(ResolvedObject {
                id: geo.id,
                shape: TargetShape::Boxed(geo.bounds),
                is_trigger: geo.layers.contains(LayerMask::TRIGGER),
            });
        }

        let matches_dynamic = |obj: &&gridscape::DynamicObject| {
            by_id.map_or(false, |id| obj.id == id) || by_name.map_or(false, |n| obj.name == n)
        };
        self.snapshot
            .dynamic_objects
            .iter()
            .find(matches_dynamic)
            .map(|obj| ResolvedObject {
                id: obj.id,
                shape: TargetShape::Sphere {
                    center: obj.position,
                    radius: obj.radius,
                },
                is_trigger: obj.layers.contains(LayerMask::TRIGGER),
            })
    }

    /// Ground elevation under a point, probed by a downward ray.
    ///
    /// Falls back to the point's own height when no ground is found within
    /// the probe range.
    #[must_use]
    pub fn ground_height(&self, point: Vec3, mask: LayerMask) -> f32 {
        const PROBE_UP: f32 = 2.0;
        const PROBE_RANGE: f32 = 6.0;
        let origin = point + Vec3::Y * PROBE_UP;
        self.raycast(origin, -Vec3::Y, PROBE_RANGE, mask)
            .map_or(point.y, |hit| hit.point.y)
    }

    /// Deterministic per-cell seed for sampled evaluators.
    ///
    /// Derived from the query id and the cell coordinate, so sampling is
    /// reproducible across runs and across parallel schedules.
    #[must_use]
    pub fn sample_seed(&self, cell: &Cell) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.query.id.hash(&mut hasher);
        cell.coord.hash(&mut hasher);
        hasher.finish()
    }
}
