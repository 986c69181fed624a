//! Property tests: boundedness and monotonicity over random inputs.

use glam::Vec3;
use proptest::prelude::*;

use gridscape::Value;

use crate::params::Params;
use crate::query::{Condition, ConditionKind, Criterion, CriterionKind, Query};
use crate::scoring;
use crate::view::QueryView;

use super::helpers::walled_snapshot;

const ALL_CRITERIA: [CriterionKind; 8] = [
    CriterionKind::ProximityTo,
    CriterionKind::FarthestFrom,
    CriterionKind::DensityOfObjects,
    CriterionKind::HeightPreference,
    CriterionKind::SlopeAnalysis,
    CriterionKind::CoverQuality,
    CriterionKind::PathComplexity,
    CriterionKind::MultiPoint,
];

/// A parameter bag stuffed with plausible-to-hostile values for every key
/// the evaluators read.
fn fuzzed_params(target: Vec3, magnitude: f32, mode: &str, curve: &str) -> Params {
    Params::new()
        .with("target", target)
        .with("start", target)
        .with("maxDistance", magnitude)
        .with("minDistance", magnitude * 0.25)
        .with("optimalDistance", magnitude * 0.5)
        .with("radius", magnitude * 0.1)
        .with("maxDensity", magnitude * 0.2)
        .with("referenceHeight", target.y)
        .with("heightRange", magnitude * 0.3)
        .with("scoringCurve", curve)
        .with("mode", mode)
        .with("preference", mode)
        .with("aggregation", mode)
        .with(
            "points",
            Value::List(vec![Value::Vec3(target), Value::Vec3(-target)]),
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Every criterion stays in [0, 1] no matter how the parameters look —
    /// including nonsense modes, zero ranges, and negative magnitudes.
    #[test]
    fn score_is_always_bounded(
        kind_index in 0usize..ALL_CRITERIA.len(),
        tx in -30.0f32..30.0,
        ty in -10.0f32..10.0,
        tz in -30.0f32..30.0,
        magnitude in -5.0f32..50.0,
        mode in prop::sample::select(vec!["count", "inverse", "higher", "specific", "closest", "weighted", "garbage", ""]),
        curve in prop::sample::select(vec!["linear", "exponential", "logarithmic", "smoothstep", "inverse", "threshold", "wiggly"]),
        cell_index in 0usize..400,
    ) {
        let (world, snap) = walled_snapshot();
        let query = Query::new("prop");
        let view = QueryView::new(&snap, &world, &query);
        let cell = &snap.grid.cells()[cell_index];

        let params = fuzzed_params(Vec3::new(tx, ty, tz), magnitude, mode, curve);
        let criterion = Criterion::new(ALL_CRITERIA[kind_index], params, 1.0);
        let score = scoring::score(cell, &criterion, &view);
        prop_assert!((0.0..=1.0).contains(&score), "score {score} out of bounds");
        prop_assert!(score.is_finite());
    }

    /// An empty parameter bag is also safe for every criterion.
    #[test]
    fn score_survives_empty_params(kind_index in 0usize..ALL_CRITERIA.len(), cell_index in 0usize..400) {
        let (world, snap) = walled_snapshot();
        let query = Query::new("prop");
        let view = QueryView::new(&snap, &world, &query);
        let cell = &snap.grid.cells()[cell_index];

        let criterion = Criterion::new(ALL_CRITERIA[kind_index], Params::new(), 1.0);
        let score = scoring::score(cell, &criterion, &view);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// The weighted mean of bounded scores is bounded, and zero total
    /// weight collapses to exactly zero.
    #[test]
    fn weighted_mean_is_bounded(
        w1 in 0.0f32..4.0,
        w2 in 0.0f32..4.0,
        max_dist in 1.0f32..40.0,
    ) {
        let (world, snap) = walled_snapshot();
        let query = Query::new("mean")
            .with_criterion(Criterion::new(
                CriterionKind::ProximityTo,
                Params::new().with("target", Vec3::ZERO).with("maxDistance", max_dist),
                w1,
            ))
            .with_criterion(Criterion::new(
                CriterionKind::HeightPreference,
                Params::new(),
                w2,
            ));
        let result = crate::executor::execute(&query, &snap, &world);
        prop_assert!(result.is_success());
        for candidate in &result.results {
            prop_assert!(candidate.score.is_finite());
            prop_assert!((0.0..=1.0).contains(&candidate.score));
            if w1 + w2 == 0.0 {
                prop_assert_eq!(candidate.score, 0.0);
            }
        }
    }

    /// Appending any condition can only narrow the surviving set.
    #[test]
    fn filters_only_narrow(
        max_dist in 0.0f32..12.0,
        extra_max in 0.0f32..12.0,
        invert in proptest::bool::ANY,
    ) {
        let (world, snap) = walled_snapshot();
        let base = Query::new("narrow")
            .with_desired_count(1000)
            .with_condition(Condition::new(
                ConditionKind::DistanceTo,
                Params::new().with("target", Vec3::new(0.5, 0.5, 0.5)).with("maxDistance", max_dist),
            ));
        let extra = Condition {
            kind: ConditionKind::DistanceTo,
            params: Params::new()
                .with("target", Vec3::new(-2.5, 1.5, 0.5))
                .with("maxDistance", extra_max),
            invert,
        };
        let narrowed = base.clone().with_condition(extra);

        let base_count = crate::executor::execute(&base, &snap, &world).results.len();
        let narrowed_count = crate::executor::execute(&narrowed, &snap, &world).results.len();
        prop_assert!(narrowed_count <= base_count);
    }
}

#[test]
fn two_half_weight_criteria_average_their_scores() {
    let (world, snap) = walled_snapshot();
    // Constant-score criteria make the expected mean exact: `specific`
    // height preference at the cell's own row scores 1, and an impossible
    // far target scores 0.
    let query = Query::new("exact")
        .with_desired_count(1)
        .with_criterion(Criterion::new(
            CriterionKind::HeightPreference,
            Params::new()
                .with("referenceHeight", 0.5_f32)
                .with("heightRange", 0.5_f32)
                .with("preference", "specific"),
            0.5,
        ))
        .with_criterion(Criterion::new(
            CriterionKind::FarthestFrom,
            Params::new()
                .with("target", Vec3::new(0.5, 0.5, 0.5))
                .with("maxDistance", 1e9_f32),
            0.5,
        ));
    let result = crate::executor::execute(&query, &snap, &world);
    let best = result.best().unwrap();
    // Bottom-row cells score (1.0 * 0.5 + 0.0 * 0.5) / 1.0 = 0.5.
    assert!((best.score - 0.5).abs() < 1e-4);
}
