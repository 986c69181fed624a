//! HeightPreference: elevation relative to a reference height.

use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

/// Parameters: `referenceHeight` (default 0), `heightRange` (normalization
/// range, default 10), `preference` (`higher` | `lower` | `specific` |
/// `avoid`, default `higher`).
///
/// `higher`/`lower` grade linearly across `[reference - range, reference +
/// range]`; `specific` scores 1 at the reference and falls off with
/// distance; `avoid` is its mirror.
pub(super) fn evaluate(cell: &Cell, params: &Params, _view: &QueryView) -> f32 {
    let reference = params.get_f32("referenceHeight", 0.0);
    let range = params.get_f32("heightRange", 10.0).max(f32::EPSILON);

    let delta = cell.position.y - reference;
    let graded = ((delta + range) / (2.0 * range)).clamp(0.0, 1.0);
    let deviation = (delta.abs() / range).clamp(0.0, 1.0);

    match params
        .get_str("preference")
        .unwrap_or("higher")
        .to_ascii_lowercase()
        .as_str()
    {
        "higher" => graded,
        "lower" => 1.0 - graded,
        "specific" => 1.0 - deviation,
        "avoid" => deviation,
        other => {
            warn!(kind = "HeightPreference", preference = other, "unknown preference; using higher");
            graded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use crate::tests::flat_snapshot;
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
    fn test_higher_and_lower_are_mirrors() {
        let (world, snap) = flat_snapshot();
        let query = Query::new("q");
        let view = QueryView::new(&snap, &world, &query);
        let low = cell_ref(&snap, Vec3::new(0.5, 0.5, 0.5));
        let high = cell_ref(&snap, Vec3::new(0.5, 3.5, 0.5));

        let higher = Params::new().with("referenceHeight", 2.0_f32).with("heightRange", 2.0_f32);
        assert!(evaluate(high, &higher, &view) > evaluate(low, &higher, &view));

        let lower = Params::new()
            .with("referenceHeight", 2.0_f32)
            .with("heightRange", 2.0_f32)
            .with("preference", "lower");
        assert!(evaluate(low, &lower, &view) > evaluate(high, &lower, &view));
    }

    #[test]
    fn test_specific_peaks_at_reference() {
        let (world, snap) = flat_snapshot();
        let query = Query::new("q");
        let view = QueryView::new(&snap, &world, &query);
        let at_ref = cell_ref(&snap, Vec3::new(0.5, 1.5, 0.5));
        let off_ref = cell_ref(&snap, Vec3::new(0.5, 3.5, 0.5));

        let params = Params::new()
            .with("referenceHeight", 1.5_f32)
            .with("heightRange", 4.0_f32)
            .with("preference", "specific");
        assert_eq!(evaluate(at_ref, &params, &view), 1.0);
        assert!(evaluate(off_ref, &params, &view) < 1.0);

        let avoid = Params::new()
            .with("referenceHeight", 1.5_f32)
            .with("heightRange", 4.0_f32)
            .with("preference", "avoid");
        assert_eq!(evaluate(at_ref, &avoid, &view), 0.0);
        assert!(evaluate(off_ref, &avoid, &view) > 0.0);
    }
}
