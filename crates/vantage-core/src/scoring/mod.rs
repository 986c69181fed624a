//! Scoring evaluators.
//!
//! Each criterion kind has a pure evaluator: cell in, score out. Dispatch is
//! an exhaustive `match` over [`CriterionKind`], and every score is clamped
//! to [0, 1] before it leaves this module, so a misbehaving parameter bag
//! can skew a ranking but never break score boundedness.

mod cover;
mod density;
mod height;
mod multipoint;
mod path;
mod proximity;
mod slope;

use gridscape::Cell;
use tracing::warn;

use crate::query::{Criterion, CriterionKind};
use crate::view::QueryView;

/// Score a cell against a criterion. Always returns a value in [0, 1].
#[must_use]
pub fn score(cell: &Cell, criterion: &Criterion, view: &QueryView) -> f32 {
    let raw = match criterion.kind {
        CriterionKind::ProximityTo => proximity::proximity_to(cell, &criterion.params, view),
        CriterionKind::FarthestFrom => proximity::farthest_from(cell, &criterion.params, view),
        CriterionKind::DensityOfObjects => density::evaluate(cell, &criterion.params, view),
        CriterionKind::HeightPreference => height::evaluate(cell, &criterion.params, view),
        CriterionKind::SlopeAnalysis => slope::evaluate(cell, &criterion.params, view),
        CriterionKind::CoverQuality => cover::evaluate(cell, &criterion.params, view),
        CriterionKind::PathComplexity => path::evaluate(cell, &criterion.params, view),
        CriterionKind::MultiPoint => multipoint::evaluate(cell, &criterion.params, view),
    };
    raw.clamp(0.0, 1.0)
}

/// Score when a criterion cannot evaluate meaningfully (e.g. a missing
/// target): neutral rather than zero, so malformed criteria do not bias the
/// ranking against otherwise good candidates.
pub(crate) const NEUTRAL_SCORE: f32 = 0.5;

/// Response curve applied to a normalized closeness/farness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Curve {
    Linear,
    Exponential,
    Logarithmic,
    Smoothstep,
    Inverse,
    Threshold,
}

impl Curve {
    /// Parse a curve name; unknown names fall back to linear with a warning.
    pub(crate) fn parse_or_linear(name: Option<&str>) -> Self {
        match name.map(str::to_ascii_lowercase).as_deref() {
            None | Some("linear") => Self::Linear,
            Some("exponential") => Self::Exponential,
            Some("logarithmic") => Self::Logarithmic,
            Some("smoothstep") => Self::Smoothstep,
            Some("inverse") => Self::Inverse,
            Some("threshold") => Self::Threshold,
            Some(other) => {
                warn!(curve = other, "unknown scoring curve; using linear");
                Self::Linear
            }
        }
    }
}

/// Hermite smoothstep on [0, 1].
pub(crate) fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Logarithmic easing on [0, 1]: 0 at 0, 1 at 1, concave in between.
pub(crate) fn log_ease(x: f32) -> f32 {
    (1.0 + x.clamp(0.0, 1.0) * (std::f32::consts::E - 1.0)).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
        assert!(smoothstep(0.25) < 0.25);
        assert!(smoothstep(0.75) > 0.75);
    }

    #[test]
    fn test_log_ease_endpoints() {
        assert!(log_ease(0.0).abs() < 1e-6);
        assert!((log_ease(1.0) - 1.0).abs() < 1e-6);
        assert!(log_ease(0.5) > 0.5);
    }

    #[test]
    fn test_curve_parsing() {
        assert_eq!(Curve::parse_or_linear(None), Curve::Linear);
        assert_eq!(Curve::parse_or_linear(Some("Smoothstep")), Curve::Smoothstep);
        assert_eq!(Curve::parse_or_linear(Some("wiggly")), Curve::Linear);
    }
}
