//! DensityOfObjects: how crowded the cell's neighborhood is.

use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

/// Parameters: `radius` (in cells, default 2), `objectWeight` (per dynamic
/// occupant, default 1), `staticWeight` (per occupied cell, default 0.25),
/// `distanceDecay` (inverse-square falloff toward the neighborhood edge,
/// default true), `maxDensity` (normalization, default 10), `mode` (`count`
/// | `weighted` | `inverse`, default `weighted`).
///
/// `count` and `weighted` aggregate identically — both divide the decayed
/// weighted total by `maxDensity`; the two spellings are kept for caller
/// compatibility. `inverse` flips the result so empty neighborhoods score
/// high. When the query names a target object kind, only occupants of that
/// kind are counted.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(super) fn evaluate(cell: &Cell, params: &Params, view: &QueryView) -> f32 {
    let radius_cells = params.get_f32("radius", 2.0).max(0.0);
    let object_weight = params.get_f32("objectWeight", 1.0);
    let static_weight = params.get_f32("staticWeight", 0.25);
    let decay_enabled = params.get_bool("distanceDecay", true);
    let max_density = params.get_f32("maxDensity", 10.0).max(f32::EPSILON);

    let grid = view.grid();
    let cell_size = grid.cell_size();
    let reach = radius_cells * cell_size;
    let window = radius_cells.ceil() as i32;
    let kind_filter = view.query().target_object_kind.as_deref();

    let mut total = 0.0_f32;
    for dz in -window..=window {
        for dy in -window..=window {
            for dx in -window..=window {
                let Some(neighbor) = grid.cell_at(cell.coord.offset(dx, dy, dz)) else {
                    continue;
                };
                let dist = neighbor.position.distance(cell.position);
                if dist > reach + f32::EPSILON {
                    continue;
                }
                let decay = if decay_enabled {
                    let cells_away = dist / cell_size;
                    1.0 / (1.0 + cells_away * cells_away)
                } else {
                    1.0
                };

                let occupants = match kind_filter {
                    None => neighbor.dynamic_occupants.len(),
                    Some(kind) => neighbor
                        .dynamic_occupants
                        .iter()
                        .filter(|id| {
                            view.snapshot()
                                .find_dynamic(**id)
                                .is_some_and(|obj| obj.kind == kind)
                        })
                        .count(),
                };
                total += occupants as f32 * object_weight * decay;
                if neighbor.static_occupancy {
                    total += static_weight * decay;
                }
            }
        }
    }

    let normalized = (total / max_density).clamp(0.0, 1.0);
    match params.get_str("mode").unwrap_or("weighted").to_ascii_lowercase().as_str() {
        "count" | "weighted" => normalized,
        "inverse" => 1.0 - normalized,
        other => {
            warn!(kind = "DensityOfObjects", mode = other, "unknown mode; using weighted");
            normalized
        }
    }
}
