//! World fixtures and setup utilities for tests.

use std::sync::Once;

use glam::Vec3;

use gridscape::{Bounds, ScriptedWorld};

use crate::environment::{EnvironmentConfig, EnvironmentSnapshot};

/// Route tracing output through the test harness, once per process.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// An open arena: a flat floor slab, nothing else.
///
/// The floor spans `[-20, 20]` in X/Z with its top surface at `y = 0`.
pub fn arena_world() -> ScriptedWorld {
    init_test_logging();
    let mut world = ScriptedWorld::new("arena");
    world.add_ground(
        "floor",
        Bounds::from_min_max(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(20.0, 0.0, 20.0)),
    );
    world
}

/// The arena plus a wall and two dynamic objects.
///
/// - wall: `x` in `[2.5, 3.5]`, `y` in `[0, 3]`, `z` in `[-3, 3]`
/// - "guard" (enemy) at `(-2.5, 0.5, -2.5)`
/// - "medkit" (pickup) at `(-2.5, 0.5, 2.5)`
pub fn walled_world() -> ScriptedWorld {
    let mut world = arena_world();
    world.add_block(
        "wall",
        Bounds::from_min_max(Vec3::new(2.5, 0.0, -3.0), Vec3::new(3.5, 3.0, 3.0)),
    );
    world.add_dynamic("guard", Vec3::new(-2.5, 0.5, -2.5), "enemy");
    world.add_dynamic("medkit", Vec3::new(-2.5, 0.5, 2.5), "pickup");
    world
}

/// The arena with a raised terrace: ground at `y = 0` for `x < 0` and
/// `y = 1` for `x >= 0`, with the step edge along `x = 0`.
pub fn terraced_world() -> ScriptedWorld {
    init_test_logging();
    let mut world = ScriptedWorld::new("terrace");
    world.add_ground(
        "lower",
        Bounds::from_min_max(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(0.0, 0.0, 20.0)),
    );
    world.add_ground(
        "upper",
        Bounds::from_min_max(Vec3::new(0.0, -1.0, -20.0), Vec3::new(20.0, 1.0, 20.0)),
    );
    world
}

/// The standard test region: a 10x4x10 block of 1-unit cells whose bottom
/// cell row sits half a unit above the arena floor.
pub fn arena_config() -> EnvironmentConfig {
    EnvironmentConfig::new().with_region(Vec3::new(0.0, 2.0, 0.0), Vec3::new(10.0, 4.0, 10.0))
}

/// Build a snapshot over the given world with the standard test region.
pub fn snapshot_of(world: &ScriptedWorld) -> EnvironmentSnapshot {
    let config = arena_config();
    let scene = "fixture".to_string();
    EnvironmentSnapshot::build(world, &config, scene, 0).expect("fixture snapshot builds")
}

/// The open arena voxelized with the standard test region.
pub fn flat_snapshot() -> (ScriptedWorld, EnvironmentSnapshot) {
    let world = arena_world();
    let snap = snapshot_of(&world);
    (world, snap)
}

/// The walled arena voxelized with the standard test region.
pub fn walled_snapshot() -> (ScriptedWorld, EnvironmentSnapshot) {
    let world = walled_world();
    let snap = snapshot_of(&world);
    (world, snap)
}

/// The terraced arena voxelized with the standard test region.
pub fn terraced_snapshot() -> (ScriptedWorld, EnvironmentSnapshot) {
    let world = terraced_world();
    let snap = snapshot_of(&world);
    (world, snap)
}
