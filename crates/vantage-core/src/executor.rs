//! Query execution: filter, score, rank.
//!
//! Execution is stateless per call and proceeds through three phases:
//!
//! 1. **FILTER**: every cell is checked against the area of interest and the
//!    condition list (logical AND, short-circuit, list order — callers can
//!    put cheap or selective filters first).
//! 2. **SCORE**: survivors are scored in parallel. Scoring writes into an
//!    index-preserving vector, so parallel scheduling cannot perturb the
//!    grid iteration order that ranking relies on.
//! 3. **RANK**: a stable descending sort by final score — ties keep grid
//!    iteration order, which makes results deterministic — then truncation
//!    to the desired count.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use gridscape::WorldSource;

use crate::conditions;
use crate::environment::EnvironmentSnapshot;
use crate::query::{LocationCandidate, Query, QueryResult};
use crate::scoring;
use crate::view::QueryView;

/// Failure message when filtering leaves no candidates.
pub const NO_CANDIDATES: &str = "No valid candidates found";
/// Failure message when no environment snapshot exists.
pub const NOT_INITIALIZED: &str = "Environment not initialized";

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> f32 {
    started.elapsed().as_secs_f64() as f32 * 1000.0
}

/// Execute a query against a snapshot.
///
/// Never panics on malformed queries: configuration problems and empty
/// results are reported through [`QueryResult::failure`].
#[must_use]
pub fn execute(query: &Query, snapshot: &EnvironmentSnapshot, world: &dyn WorldSource) -> QueryResult {
    let started = Instant::now();

    if query.desired_count == 0 {
        return QueryResult::failure(
            &query.id,
            "desired result count must be positive",
            elapsed_ms(started),
        );
    }

    let view = QueryView::new(snapshot, world, query);
    let grid = &snapshot.grid;

    // FILTER: area of interest first, then conditions in list order.
    let survivors: Vec<usize> = grid
        .cells()
        .iter()
        .enumerate()
        .filter(|&(_, cell)| {
            if let Some(area) = &query.context.area_of_interest {
                if !area.contains(cell.position) {
                    return false;
                }
            }
            query
                .conditions
                .iter()
                .all(|condition| conditions::evaluate(cell, condition, &view))
        })
        .map(|(index, _)| index)
        .collect();

    debug!(
        query = %query.id,
        phase = "filter",
        cells = grid.cell_count(),
        survivors = survivors.len(),
        "filtering complete"
    );

    if survivors.is_empty() {
        return QueryResult::failure(&query.id, NO_CANDIDATES, elapsed_ms(started));
    }

    // SCORE: parallel map over survivors; collect preserves survivor order,
    // which is grid iteration order.
    let total_weight: f32 = query.criteria.iter().map(|c| c.weight).sum();
    let mut candidates: Vec<LocationCandidate> = survivors
        .par_iter()
        .map(|&index| {
            let cell = &grid.cells()[index];
            let mut breakdown = BTreeMap::new();
            let mut accumulated = 0.0_f32;
            for criterion in &query.criteria {
                let value = scoring::score(cell, criterion, &view);
                breakdown.insert(criterion.kind.as_str().to_string(), value);
                accumulated += value * criterion.weight;
            }
            // Zero total weight scores zero, never NaN.
            let score = if total_weight > 0.0 {
                (accumulated / total_weight).clamp(0.0, 1.0)
            } else {
                0.0
            };
            LocationCandidate {
                position: cell.position,
                coord: Some(cell.coord),
                score,
                breakdown,
                associated_objects: cell.dynamic_occupants.clone(),
            }
        })
        .collect();

    debug!(
        query = %query.id,
        phase = "score",
        candidates = candidates.len(),
        criteria = query.criteria.len(),
        "scoring complete"
    );

    // RANK: stable descending sort; equal scores keep grid order.
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(query.desired_count);

    let elapsed = elapsed_ms(started);
    debug!(
        query = %query.id,
        phase = "rank",
        returned = candidates.len(),
        elapsed_ms = elapsed,
        "query complete"
    );
    QueryResult::success(&query.id, candidates, elapsed)
}
