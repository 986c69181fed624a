//! ProximityTo and FarthestFrom: distance-based preference scores.

use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

use super::{log_ease, smoothstep, Curve, NEUTRAL_SCORE};

/// ProximityTo: closer to the target scores higher.
///
/// Parameters: `target` (required; missing yields the neutral score),
/// `maxDistance` (normalization range, default 100), `optimalDistance`
/// (distance scored as perfect, default 0), `scoringCurve` (`linear` |
/// `exponential` | `logarithmic` | `smoothstep` | `inverse`, default
/// linear), `exponent` (for the exponential curve, default 2).
pub(super) fn proximity_to(cell: &Cell, params: &Params, view: &QueryView) -> f32 {
    let Some(target) = view.resolve_point(params, "target") else {
        warn!(kind = "ProximityTo", "missing target; neutral score");
        return NEUTRAL_SCORE;
    };

    let max_distance = params.get_f32("maxDistance", 100.0).max(f32::EPSILON);
    let optimal = params.get_f32("optimalDistance", 0.0);
    let curve = Curve::parse_or_linear(params.get_str("scoringCurve"));

    let raw = cell.position.distance(target);
    let deviation = (raw - optimal).abs();
    let normalized = (deviation / max_distance).clamp(0.0, 1.0);
    let closeness = 1.0 - normalized;

    match curve {
        Curve::Linear => closeness,
        Curve::Exponential => closeness.powf(params.get_f32("exponent", 2.0)),
        Curve::Logarithmic => log_ease(closeness),
        Curve::Smoothstep => smoothstep(closeness),
        Curve::Inverse => 1.0 / (1.0 + deviation * deviation),
        Curve::Threshold => {
            warn!(kind = "ProximityTo", "threshold curve not applicable; using linear");
            closeness
        }
    }
}

/// FarthestFrom: farther from the target scores higher.
///
/// Parameters: `target` (required; missing yields the neutral score),
/// `maxDistance` (normalization range, default 100), `minDistance` (floor —
/// anything closer scores 0, default 0), `scoringCurve` (`linear` |
/// `exponential` | `logarithmic` | `smoothstep` | `threshold`, default
/// linear), `exponent` (default 2), `threshold` (distance for the threshold
/// curve, default `maxDistance / 2`).
pub(super) fn farthest_from(cell: &Cell, params: &Params, view: &QueryView) -> f32 {
    let Some(target) = view.resolve_point(params, "target") else {
        warn!(kind = "FarthestFrom", "missing target; neutral score");
        return NEUTRAL_SCORE;
    };

    let max_distance = params.get_f32("maxDistance", 100.0).max(f32::EPSILON);
    let min_distance = params.get_f32("minDistance", 0.0);
    let curve = Curve::parse_or_linear(params.get_str("scoringCurve"));

    let raw = cell.position.distance(target);
    if raw < min_distance {
        return 0.0;
    }
    let farness = (raw / max_distance).clamp(0.0, 1.0);

    match curve {
        Curve::Linear => farness,
        Curve::Exponential => farness.powf(params.get_f32("exponent", 2.0)),
        Curve::Logarithmic => log_ease(farness),
        Curve::Smoothstep => smoothstep(farness),
        Curve::Threshold => {
            let threshold = params.get_f32("threshold", max_distance * 0.5);
            if raw >= threshold {
                1.0
            } else {
                0.0
            }
        }
        Curve::Inverse => {
            warn!(kind = "FarthestFrom", "inverse curve not applicable; using linear");
            farness
        }
    }
}
