//! DistanceTo: the cell's distance to a target point lies within bounds.

use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::query::DistanceMetric;
use crate::view::QueryView;

/// Parameters: `target` (point or reference-point name, required),
/// `minDistance` (default 0), `maxDistance` (default +inf), `metric`
/// (default euclidean; unknown names fall back to euclidean).
///
/// A missing target fails the condition — the conservative default.
pub(super) fn evaluate(cell: &Cell, params: &Params, view: &QueryView) -> bool {
    let Some(target) = view.resolve_point(params, "target") else {
        warn!(kind = "DistanceTo", "missing target; condition fails");
        return false;
    };

    let metric = params
        .get_str("metric")
        .map(|name| {
            DistanceMetric::parse(name).unwrap_or_else(|| {
                warn!(kind = "DistanceTo", metric = name, "unknown metric; using euclidean");
                DistanceMetric::Euclidean
            })
        })
        .unwrap_or_default();

    let min = params.get_f32("minDistance", 0.0);
    let max = params.get_f32("maxDistance", f32::INFINITY);

    let distance = metric.distance(cell.position, target);
    distance >= min && distance <= max
}
