//! MultiPoint: aggregate distance scores over several target points.

use glam::Vec3;
use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

use super::NEUTRAL_SCORE;

/// Parameters: `points` (list of vectors; when absent the query's reference
/// points are used), `maxDistance` (per-point normalization, default 100),
/// `aggregation` (`average` | `closest` | `farthest` | `weighted` | `best`,
/// default `average`), `weights` (float list for `weighted`; a count
/// mismatch falls back to `average`).
///
/// Each point contributes a proximity-style score `1 - d / maxDistance`.
/// `closest` takes the nearest point's score, `farthest` the most distant
/// point's, `best` the highest. With no points at all the score is neutral.
pub(super) fn evaluate(cell: &Cell, params: &Params, view: &QueryView) -> f32 {
    let mut points: Vec<Vec3> = params.get_vec3_list("points");
    if points.is_empty() {
        points = view
            .query()
            .context
            .reference_points
            .iter()
            .map(|rp| rp.position)
            .collect();
    }
    if points.is_empty() {
        warn!(kind = "MultiPoint", "no points available; neutral score");
        return NEUTRAL_SCORE;
    }

    let max_distance = params.get_f32("maxDistance", 100.0).max(f32::EPSILON);
    let point_score =
        |p: &Vec3| 1.0 - (cell.position.distance(*p) / max_distance).clamp(0.0, 1.0);
    let scores: Vec<f32> = points.iter().map(point_score).collect();

    #[allow(clippy::cast_precision_loss)]
    let average = scores.iter().sum::<f32>() / scores.len() as f32;

    let aggregation = params
        .get_str("aggregation")
        .unwrap_or("average")
        .to_ascii_lowercase();
    match aggregation.as_str() {
        "average" => average,
        // The nearest point has the highest proximity score.
        "closest" | "best" => scores.iter().copied().fold(0.0, f32::max),
        "farthest" => scores.iter().copied().fold(1.0, f32::min),
        "weighted" => {
            let weights = params.get_f32_list("weights");
            if weights.len() != scores.len() {
                warn!(
                    kind = "MultiPoint",
                    points = scores.len(),
                    weights = weights.len(),
                    "weight count mismatch; using average"
                );
                return average;
            }
            let total_weight: f32 = weights.iter().sum();
            if total_weight <= f32::EPSILON {
                return 0.0;
            }
            scores
                .iter()
                .zip(&weights)
                .map(|(s, w)| s * w)
                .sum::<f32>()
                / total_weight
        }
        other => {
            warn!(kind = "MultiPoint", aggregation = other, "unknown aggregation; using average");
            average
        }
    }
}
