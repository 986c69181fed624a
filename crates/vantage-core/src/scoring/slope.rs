//! SlopeAnalysis: local ground slope from neighbor height probes.

use glam::Vec3;
use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

/// The 4 planar probe offsets.
const PLANAR_DIRS: [(f32, f32); 4] = [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)];

/// Parameters: `sampleDistance` (probe offset, default one cell size),
/// `preference` (`flat` | `steep` | `specific`, default `flat`), `maxAngle`
/// (degrees, default 45), `targetAngle` / `tolerance` (degrees, for
/// `specific`, defaults 0 / 10), `layers` (default obstacle layers).
///
/// Probes the ground height under the cell and its 4 planar neighbors, takes
/// the steepest gradient, converts it to an angle, and scores it against the
/// preference.
pub(super) fn evaluate(cell: &Cell, params: &Params, view: &QueryView) -> f32 {
    let sample_distance = params
        .get_f32("sampleDistance", view.grid().cell_size())
        .max(f32::EPSILON);
    let mask = view.layer_mask(params);

    let center_height = view.ground_height(cell.position, mask);
    let mut max_gradient = 0.0_f32;
    for (dx, dz) in PLANAR_DIRS {
        let probe = cell.position + Vec3::new(dx * sample_distance, 0.0, dz * sample_distance);
        let height = view.ground_height(probe, mask);
        let gradient = (height - center_height).abs() / sample_distance;
        max_gradient = max_gradient.max(gradient);
    }
    let angle = max_gradient.atan().to_degrees();

    let max_angle = params.get_f32("maxAngle", 45.0).max(f32::EPSILON);
    let steepness = (angle / max_angle).clamp(0.0, 1.0);

    match params
        .get_str("preference")
        .unwrap_or("flat")
        .to_ascii_lowercase()
        .as_str()
    {
        "flat" => 1.0 - steepness,
        "steep" => steepness,
        "specific" => {
            let target = params.get_f32("targetAngle", 0.0);
            let tolerance = params.get_f32("tolerance", 10.0).max(f32::EPSILON);
            1.0 - ((angle - target).abs() / tolerance).clamp(0.0, 1.0)
        }
        other => {
            warn!(kind = "SlopeAnalysis", preference = other, "unknown preference; using flat");
            1.0 - steepness
        }
    }
}
