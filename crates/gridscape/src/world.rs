//! World-snapshot primitives and the world provider boundary.
//!
//! The query engine never talks to a host engine directly. It consumes a
//! [`WorldSource`]: an enumeration of static geometry and dynamic objects,
//! plus physics-style ray and overlap queries, all treated as pure functions
//! against a frozen world state. [`ScriptedWorld`] is the in-memory reference
//! implementation used by tests and headless hosts.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::value::Value;
use crate::Bounds;

/// Unique identifier for a world object (static or dynamic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Create an object id from a raw value.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags::bitflags! {
    /// Collision layers for ray and overlap queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LayerMask: u32 {
        /// Ground and terrain surfaces
        const TERRAIN = 1 << 0;
        /// Buildings, walls, large fixtures
        const STRUCTURE = 1 << 1;
        /// Small placed props
        const PROP = 1 << 2;
        /// Mobile units and agents
        const UNIT = 1 << 3;
        /// Non-solid trigger volumes
        const TRIGGER = 1 << 4;
        /// The common obstacle layers used as the default for physical filters.
        const OBSTACLES = Self::TERRAIN.bits() | Self::STRUCTURE.bits() | Self::PROP.bits();
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::OBSTACLES
    }
}

impl LayerMask {
    /// Parse a single layer name, case-insensitive.
    #[must_use]
    pub fn from_name_ci(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "terrain" => Some(Self::TERRAIN),
            "structure" => Some(Self::STRUCTURE),
            "prop" => Some(Self::PROP),
            "unit" => Some(Self::UNIT),
            "trigger" => Some(Self::TRIGGER),
            "obstacles" => Some(Self::OBSTACLES),
            _ => None,
        }
    }

    /// Build a mask from a list of layer names; unknown names are ignored.
    /// An empty or fully unknown list yields the default obstacle mask.
    #[must_use]
    pub fn from_names<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        let mut mask = Self::empty();
        for name in names {
            if let Some(layer) = Self::from_name_ci(name) {
                mask |= layer;
            }
        }
        if mask.is_empty() {
            Self::default()
        } else {
            mask
        }
    }
}

/// A snapshot of one piece of collidable, non-moving scene geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticGeometry {
    /// Stable object id
    pub id: ObjectId,
    /// Human-readable name
    pub name: String,
    /// Axis-aligned world-space bounds
    pub bounds: Bounds,
    /// Free-form type tag (e.g. "wall", "crate")
    pub kind: String,
    /// Collision layers this geometry occupies
    pub layers: LayerMask,
}

/// A snapshot of a movable entity at initialization time.
///
/// Position is frozen at snapshot time; queries never observe live movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicObject {
    /// Stable object id
    pub id: ObjectId,
    /// Human-readable name
    pub name: String,
    /// World position at snapshot time
    pub position: Vec3,
    /// Free-form type tag (e.g. "enemy", "pickup")
    pub kind: String,
    /// Body radius used for overlap queries
    pub radius: f32,
    /// Collision layers this object occupies
    pub layers: LayerMask,
    /// Free-form properties
    pub properties: BTreeMap<String, Value>,
}

/// Result of a successful raycast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// The object that was hit
    pub object: ObjectId,
}

/// Provider boundary for a frozen world state.
///
/// Implementations must behave as pure query functions: repeated calls with
/// the same arguments return the same answers for the lifetime of the source.
pub trait WorldSource: Send + Sync {
    /// Name of the scene this source describes.
    fn scene_name(&self) -> &str;

    /// All collidable static geometry in the scene.
    fn static_geometry(&self) -> &[StaticGeometry];

    /// Dynamic objects, optionally restricted to the given type tags.
    fn dynamic_objects(&self, tag_filter: Option<&[String]>) -> Vec<DynamicObject>;

    /// Cast a ray and return the closest hit on the given layers.
    ///
    /// `dir` need not be normalized; implementations normalize it. A zero
    /// direction never hits.
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: LayerMask) -> Option<RayHit>;

    /// Ids of all objects on the given layers overlapping a sphere.
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<ObjectId>;

    /// Whether any object on the given layers overlaps a sphere.
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        !self.overlap_sphere(center, radius, mask).is_empty()
    }
}

/// In-memory [`WorldSource`] with analytic collision queries.
///
/// Static geometry collides as axis-aligned boxes (slab-method raycasts);
/// dynamic objects collide as spheres. Useful for tests, benchmarks, and
/// headless hosts that assemble a world by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptedWorld {
    scene: String,
    statics: Vec<StaticGeometry>,
    dynamics: Vec<DynamicObject>,
    next_id: u64,
}

impl ScriptedWorld {
    /// Create an empty world for the named scene.
    #[must_use]
    pub fn new(scene: &str) -> Self {
        Self {
            scene: scene.to_string(),
            statics: Vec::new(),
            dynamics: Vec::new(),
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a solid structure block on the default structure layer.
    pub fn add_block(&mut self, name: &str, bounds: Bounds) -> ObjectId {
        self.add_static(name, bounds, "block", LayerMask::STRUCTURE)
    }

    /// Add a terrain slab (typically the ground plane) on the terrain layer.
    pub fn add_ground(&mut self, name: &str, bounds: Bounds) -> ObjectId {
        self.add_static(name, bounds, "ground", LayerMask::TERRAIN)
    }

    /// Add static geometry with an explicit kind and layer set.
    pub fn add_static(
        &mut self,
        name: &str,
        bounds: Bounds,
        kind: &str,
        layers: LayerMask,
    ) -> ObjectId {
        let id = self.alloc_id();
        self.statics.push(StaticGeometry {
            id,
            name: name.to_string(),
            bounds,
            kind: kind.to_string(),
            layers,
        });
        id
    }

    /// Add a dynamic object on the unit layer with a default body radius.
    pub fn add_dynamic(&mut self, name: &str, position: Vec3, kind: &str) -> ObjectId {
        let id = self.alloc_id();
        self.dynamics.push(DynamicObject {
            id,
            name: name.to_string(),
            position,
            kind: kind.to_string(),
            radius: 0.5,
            layers: LayerMask::UNIT,
            properties: BTreeMap::new(),
        });
        id
    }

    /// Mutable access to a dynamic object, for fixture setup.
    pub fn dynamic_mut(&mut self, id: ObjectId) -> Option<&mut DynamicObject> {
        self.dynamics.iter_mut().find(|d| d.id == id)
    }

    fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
        let oc = origin - center;
        let b = oc.dot(dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        if t >= 0.0 {
            Some(t)
        } else if c <= 0.0 {
            // Origin inside the sphere.
            Some(0.0)
        } else {
            None
        }
    }
}

impl WorldSource for ScriptedWorld {
    fn scene_name(&self) -> &str {
        &self.scene
    }

    fn static_geometry(&self) -> &[StaticGeometry] {
        &self.statics
    }

    fn dynamic_objects(&self, tag_filter: Option<&[String]>) -> Vec<DynamicObject> {
        self.dynamics
            .iter()
            .filter(|obj| match tag_filter {
                Some(tags) if !tags.is_empty() => tags.iter().any(|t| t == &obj.kind),
                _ => true,
            })
            .cloned()
            .collect()
    }

    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: LayerMask) -> Option<RayHit> {
        let dir = dir.normalize_or_zero();
        if dir == Vec3::ZERO || max_dist <= 0.0 {
            return None;
        }

        let mut best: Option<RayHit> = None;
        let mut consider = |distance: f32, object: ObjectId| {
            if distance <= max_dist && best.as_ref().map_or(true, |b| distance < b.distance) {
                best = Some(RayHit {
                    distance,
                    point: origin + dir * distance,
                    object,
                });
            }
        };

        for geo in self.statics.iter().filter(|g| g.layers.intersects(mask)) {
            if let Some(t) = geo.bounds.ray_intersect(origin, dir, max_dist) {
                consider(t, geo.id);
            }
        }
        for obj in self.dynamics.iter().filter(|o| o.layers.intersects(mask)) {
            if let Some(t) = Self::ray_sphere(origin, dir, obj.position, obj.radius) {
                consider(t, obj.id);
            }
        }

        best
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<ObjectId> {
        let mut hits = Vec::new();
        for geo in self.statics.iter().filter(|g| g.layers.intersects(mask)) {
            if geo.bounds.intersects_sphere(center, radius) {
                hits.push(geo.id);
            }
        }
        for obj in self.dynamics.iter().filter(|o| o.layers.intersects(mask)) {
            if obj.position.distance(center) <= radius + obj.radius {
                hits.push(obj.id);
            }
        }
        hits
    }
}
