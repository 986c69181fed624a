//! Stable fingerprints for environment configuration and content.
//!
//! Two fingerprints drive the environment cache: the configuration hash
//! (did the caller ask for the same build?) and the content hash (what did
//! the build actually capture?). Both are deterministic — floats are hashed
//! as bit patterns and every field is visited in a fixed order — so
//! identical inputs produce identical hashes across runs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec3;

use gridscape::{DynamicObject, Grid, StaticGeometry};

use crate::environment::EnvironmentConfig;

/// Hash a float as its bit pattern, avoiding float-comparison pitfalls.
fn hash_f32<H: Hasher>(value: f32, hasher: &mut H) {
    value.to_bits().hash(hasher);
}

/// Hash a vector component-wise as bits.
fn hash_vec3<H: Hasher>(v: Vec3, hasher: &mut H) {
    hash_f32(v.x, hasher);
    hash_f32(v.y, hasher);
    hash_f32(v.z, hasher);
}

/// Compute the configuration fingerprint for an environment build.
///
/// Covers every input that affects the build: scene identity, inclusion
/// flags, tag filters, grid overrides, and the region. `force_reinitialize`
/// is deliberately excluded — forcing a rebuild does not change what is
/// being built.
#[must_use]
pub fn config_fingerprint(scene: &str, config: &EnvironmentConfig) -> u64 {
    let mut hasher = DefaultHasher::new();

    scene.hash(&mut hasher);
    config.include_static_geometry.hash(&mut hasher);
    config.include_dynamic_objects.hash(&mut hasher);
    match &config.dynamic_tag_filter {
        Some(tags) => {
            true.hash(&mut hasher);
            tags.len().hash(&mut hasher);
            for tag in tags {
                tag.hash(&mut hasher);
            }
        }
        None => false.hash(&mut hasher),
    }
    hash_f32(config.cell_size, &mut hasher);
    match config.dims_override {
        Some(dims) => {
            true.hash(&mut hasher);
            dims.x.hash(&mut hasher);
            dims.y.hash(&mut hasher);
            dims.z.hash(&mut hasher);
        }
        None => false.hash(&mut hasher),
    }
    hash_vec3(config.region_center, &mut hasher);
    hash_vec3(config.region_size, &mut hasher);

    hasher.finish()
}

/// Compute the content fingerprint of a built environment.
///
/// Covers the scene name, grid shape, and the identity/placement of every
/// captured object. Wall-clock time is intentionally not an input: two
/// identical scenes fingerprint identically across runs.
#[must_use]
pub fn content_fingerprint(
    scene: &str,
    grid: &Grid,
    statics: &[StaticGeometry],
    dynamics: &[DynamicObject],
) -> u64 {
    let mut hasher = DefaultHasher::new();

    scene.hash(&mut hasher);

    let dims = grid.dims();
    dims.x.hash(&mut hasher);
    dims.y.hash(&mut hasher);
    dims.z.hash(&mut hasher);
    hash_f32(grid.cell_size(), &mut hasher);
    hash_vec3(grid.origin(), &mut hasher);

    statics.len().hash(&mut hasher);
    for geo in statics {
        geo.id.as_u64().hash(&mut hasher);
        geo.name.hash(&mut hasher);
        geo.kind.hash(&mut hasher);
        hash_vec3(geo.bounds.min, &mut hasher);
        hash_vec3(geo.bounds.max, &mut hasher);
    }

    dynamics.len().hash(&mut hasher);
    for obj in dynamics {
        obj.id.as_u64().hash(&mut hasher);
        obj.name.hash(&mut hasher);
        obj.kind.hash(&mut hasher);
        hash_vec3(obj.position, &mut hasher);
    }

    hasher.finish()
}
