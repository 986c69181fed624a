//! ObjectProximity: spatial relation between a cell and a world object.

use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

/// Parameters: `objectId` or `objectName` (one required), `relation`
/// (`inside` | `outside` | `surface`, default `inside`), `colliderType`
/// (`solid` | `trigger` | `any`, default `any`), `minDistance` /
/// `maxDistance` (surface-distance bounds, defaults 0 / +inf).
///
/// The target resolves against the snapshot's captured geometry and objects;
/// an unresolvable target fails the condition. Distance bounds apply to the
/// distance from the cell center to the object's surface.
pub(super) fn evaluate(cell: &Cell, params: &Params, view: &QueryView) -> bool {
    let Some(object) = view.resolve_object(params) else {
        warn!(kind = "ObjectProximity", "target object not found; condition fails");
        return false;
    };

    let collider_type = params.get_str("colliderType").unwrap_or("any");
    let type_ok = match collider_type.to_ascii_lowercase().as_str() {
        "trigger" => object.is_trigger,
        "solid" => !object.is_trigger,
        "any" => true,
        other => {
            warn!(kind = "ObjectProximity", collider_type = other, "unknown collider type; accepting any");
            true
        }
    };
    if !type_ok {
        return false;
    }

    let inside = object.shape.contains(cell.position);
    let surface_distance = object.shape.surface_distance(cell.position);
    let min = params.get_f32("minDistance", 0.0);
    let max = params.get_f32("maxDistance", f32::INFINITY);
    let within_bounds = surface_distance >= min && surface_distance <= max;

    let relation = params.get_str("relation").unwrap_or("inside");
    match relation.to_ascii_lowercase().as_str() {
        "inside" => inside,
        "outside" => !inside && within_bounds,
        "surface" => within_bounds,
        other => {
            warn!(kind = "ObjectProximity", relation = other, "unknown relation; condition fails");
            false
        }
    }
}
