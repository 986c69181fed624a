//! CoverQuality: how well the position is shielded by nearby obstacles.

use glam::Vec3;
use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

/// Parameters: `threatDirections` (list of vectors; when present these
/// replace the radial probe set), `directionCount` (radial probes, default
/// 8), `eyeHeight` (probe origin offset, default 1.0), `coverDistance`
/// (probe length, default 5), `mode` (`omnidirectional` | `partial` |
/// `majority`, default `omnidirectional`), `layers` (default obstacle
/// layers).
///
/// Casts one ray per direction from eye height; a blocked ray counts as
/// cover. `omnidirectional` scores the blocked fraction, `partial` scores 1
/// when any direction is covered, `majority` scores 1 when more than half
/// are.
#[allow(clippy::cast_precision_loss)]
pub(super) fn evaluate(cell: &Cell, params: &Params, view: &QueryView) -> f32 {
    let eye_height = params.get_f32("eyeHeight", 1.0);
    let cover_distance = params.get_f32("coverDistance", 5.0).max(f32::EPSILON);
    let mask = view.layer_mask(params);

    let mut directions: Vec<Vec3> = params
        .get_vec3_list("threatDirections")
        .into_iter()
        .filter_map(|v| {
            let n = v.normalize_or_zero();
            (n != Vec3::ZERO).then_some(n)
        })
        .collect();
    if directions.is_empty() {
        let count = params.get_usize("directionCount", 8).max(1);
        directions = (0..count)
            .map(|i| {
                let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
                Vec3::new(angle.cos(), 0.0, angle.sin())
            })
            .collect();
    }

    let origin = cell.position + Vec3::Y * eye_height;
    let blocked = directions
        .iter()
        .filter(|dir| view.raycast(origin, **dir, cover_distance, mask).is_some())
        .count();
    let fraction = blocked as f32 / directions.len() as f32;

    match params
        .get_str("mode")
        .unwrap_or("omnidirectional")
        .to_ascii_lowercase()
        .as_str()
    {
        "omnidirectional" => fraction,
        "partial" => {
            if blocked > 0 {
                1.0
            } else {
                0.0
            }
        }
        "majority" => {
            if fraction > 0.5 {
                1.0
            } else {
                0.0
            }
        }
        other => {
            warn!(kind = "CoverQuality", mode = other, "unknown mode; using omnidirectional");
            fraction
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use crate::tests::walled_snapshot;
    use crate::view::QueryView;

    fn cell_ref<'a>(
        snap: &'a crate::environment::EnvironmentSnapshot,
        pos: Vec3,
    ) -> &'a Cell {
        snap.grid
            .cell_at(snap.grid.world_to_coord(pos).expect("in grid"))
            .expect("cell exists")
    }

    #[test]
    fn test_wall_provides_directional_cover() {
        let (world, snap) = walled_snapshot();
        let query = Query::new("q");
        let view = QueryView::new(&snap, &world, &query);
        let sheltered = cell_ref(&snap, Vec3::new(1.5, 0.5, 0.5));
        let exposed = cell_ref(&snap, Vec3::new(-3.5, 0.5, 0.5));

        let params = Params::new().with("eyeHeight", 0.5_f32);
        assert!(evaluate(sheltered, &params, &view) > evaluate(exposed, &params, &view));
        assert_eq!(evaluate(exposed, &params, &view), 0.0);
    }

    #[test]
    fn test_threat_directions() {
        let (world, snap) = walled_snapshot();
        let query = Query::new("q");
        let view = QueryView::new(&snap, &world, &query);
        let sheltered = cell_ref(&snap, Vec3::new(1.5, 0.5, 0.5));

        // Threat from +X: the wall blocks it completely.
        let from_wall = Params::new()
            .with("eyeHeight", 0.5_f32)
            .with(
                "threatDirections",
                gridscape::Value::List(vec![gridscape::Value::Vec3(Vec3::X)]),
            );
        assert_eq!(evaluate(sheltered, &from_wall, &view), 1.0);

        // Threat from -X: open ground, no cover.
        let from_open = Params::new()
            .with("eyeHeight", 0.5_f32)
            .with(
                "threatDirections",
                gridscape::Value::List(vec![gridscape::Value::Vec3(-Vec3::X)]),
            );
        assert_eq!(evaluate(sheltered, &from_open, &view), 0.0);
    }

    #[test]
    fn test_partial_and_majority_modes() {
        let (world, snap) = walled_snapshot();
        let query = Query::new("q");
        let view = QueryView::new(&snap, &world, &query);
        let sheltered = cell_ref(&snap, Vec3::new(1.5, 0.5, 0.5));

        let partial = Params::new().with("eyeHeight", 0.5_f32).with("mode", "partial");
        assert_eq!(evaluate(sheltered, &partial, &view), 1.0);

        // One wall out of eight directions is not a majority.
        let majority = Params::new().with("eyeHeight", 0.5_f32).with("mode", "majority");
        assert_eq!(evaluate(sheltered, &majority, &view), 0.0);
    }
}
