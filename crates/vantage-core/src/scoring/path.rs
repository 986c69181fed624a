//! PathComplexity: obstruction along the straight line from a start point.

use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

use super::NEUTRAL_SCORE;

/// Parameters: `start` (point or reference-point name, required; missing
/// yields the neutral score), `mode` (`simple` | `linecast`, default
/// `simple`), `sampleSpacing` (default one cell size), `probeRadius`
/// (default 0.4 × cell size), `maxComplexity` (default 10), `layers`
/// (default obstacle layers).
///
/// `simple` steps along the segment counting samples that overlap an
/// obstacle and scores `1 - count / maxComplexity` — clearer paths score
/// higher. `linecast` is binary: 1 for an unobstructed segment, 0 otherwise.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub(super) fn evaluate(cell: &Cell, params: &Params, view: &QueryView) -> f32 {
    let Some(start) = view.resolve_point(params, "start") else {
        warn!(kind = "PathComplexity", "missing start; neutral score");
        return NEUTRAL_SCORE;
    };
    let mask = view.layer_mask(params);
    let offset = cell.position - start;
    let length = offset.length();

    match params
        .get_str("mode")
        .unwrap_or("simple")
        .to_ascii_lowercase()
        .as_str()
    {
        "linecast" => {
            if length <= f32::EPSILON {
                return 1.0;
            }
            let blocked = view.raycast(start, offset, length - 1e-3, mask).is_some();
            if blocked {
                0.0
            } else {
                1.0
            }
        }
        mode => {
            if mode != "simple" {
                warn!(kind = "PathComplexity", mode, "unknown mode; using simple");
            }
            let cell_size = view.grid().cell_size();
            let spacing = params.get_f32("sampleSpacing", cell_size).max(f32::EPSILON);
            let probe_radius = params.get_f32("probeRadius", cell_size * 0.4).max(f32::EPSILON);
            let max_complexity = params.get_f32("maxComplexity", 10.0).max(f32::EPSILON);

            let steps = (length / spacing).ceil() as usize;
            let mut complexity = 0_usize;
            for step in 1..=steps {
                let t = (step as f32 * spacing).min(length);
                let sample = start + offset.normalize_or_zero() * t;
                if view.check_sphere(sample, probe_radius, mask) {
                    complexity += 1;
                }
            }
            1.0 - (complexity as f32 / max_complexity).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use crate::tests::walled_snapshot;
    use crate::view::QueryView;
    use glam::Vec3;

    fn cell_ref<'a>(
        snap: &'a crate::environment::EnvironmentSnapshot,
        pos: Vec3,
    ) -> &'a Cell {
        snap.grid
            .cell_at(snap.grid.world_to_coord(pos).expect("in grid"))
            .expect("cell exists")
    }

    #[test]
    fn test_clear_path_beats_blocked_path() {
        let (world, snap) = walled_snapshot();
        let query = Query::new("q");
        let view = QueryView::new(&snap, &world, &query);
        let start = Vec3::new(0.5, 1.5, 0.5);

        // Path crossing the wall vs. a path through open space.
        let behind_wall = cell_ref(&snap, Vec3::new(4.5, 1.5, 0.5));
        let open = cell_ref(&snap, Vec3::new(-4.5, 1.5, 0.5));
        let params = Params::new().with("start", start);
        assert!(evaluate(open, &params, &view) > evaluate(behind_wall, &params, &view));
        assert_eq!(evaluate(open, &params, &view), 1.0);
    }

    #[test]
    fn test_linecast_is_binary() {
        let (world, snap) = walled_snapshot();
        let query = Query::new("q");
        let view = QueryView::new(&snap, &world, &query);
        let start = Vec3::new(0.5, 1.5, 0.5);

        let behind_wall = cell_ref(&snap, Vec3::new(4.5, 1.5, 0.5));
        let open = cell_ref(&snap, Vec3::new(-4.5, 1.5, 0.5));
        let params = Params::new().with("start", start).with("mode", "linecast");
        assert_eq!(evaluate(behind_wall, &params, &view), 0.0);
        assert_eq!(evaluate(open, &params, &view), 1.0);
    }

    #[test]
    fn test_missing_start_is_neutral() {
        let (world, snap) = walled_snapshot();
        let query = Query::new("q");
        let view = QueryView::new(&snap, &world, &query);
        let cell = cell_ref(&snap, Vec3::new(-4.5, 1.5, 0.5));
        assert_eq!(evaluate(cell, &Params::new(), &view), NEUTRAL_SCORE);
    }

    #[test]
    fn test_reference_point_start() {
        let (world, snap) = walled_snapshot();
        let query = Query::new("q").with_reference_point("base", Vec3::new(0.5, 1.5, 0.5));
        let view = QueryView::new(&snap, &world, &query);
        let open = cell_ref(&snap, Vec3::new(-4.5, 1.5, 0.5));
        let params = Params::new().with("start", "base");
        assert_eq!(evaluate(open, &params, &view), 1.0);
    }
}
