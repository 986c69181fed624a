//! Clearance: the cell has headroom, lateral room, and solid ground.

use glam::Vec3;
use gridscape::Cell;

use crate::params::Params;
use crate::view::QueryView;

/// Ground must be found within this distance below the cell center.
const GROUND_PROBE: f32 = 0.5;

/// The 8 horizontal probe directions (cardinals and diagonals).
const LATERAL_DIRS: [(f32, f32); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (1.0, 1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (-1.0, -1.0),
];

/// Parameters: `requiredHeight` (default 2.0), `requiredRadius` (default
/// 1.0), `layers` (default obstacle layers).
///
/// Fails immediately for statically occupied or non-walkable cells. Passes
/// only when no obstacle sits within `requiredHeight` directly above, none
/// within `requiredRadius` in the 8 horizontal directions, and solid ground
/// lies within 0.5 units directly below.
pub(super) fn evaluate(cell: &Cell, params: &Params, view: &QueryView) -> bool {
    if cell.static_occupancy || !cell.is_walkable() {
        return false;
    }

    let required_height = params.get_f32("requiredHeight", 2.0);
    let required_radius = params.get_f32("requiredRadius", 1.0);
    let mask = view.layer_mask(params);

    // Headroom.
    if view
        .raycast(cell.position, Vec3::Y, required_height, mask)
        .is_some()
    {
        return false;
    }

    // Lateral room in all 8 directions.
    for (dx, dz) in LATERAL_DIRS {
        let dir = Vec3::new(dx, 0.0, dz).normalize();
        if view
            .raycast(cell.position, dir, required_radius, mask)
            .is_some()
        {
            return false;
        }
    }

    // Solid ground directly below.
    view.raycast(cell.position, -Vec3::Y, GROUND_PROBE, mask)
        .is_some()
}
