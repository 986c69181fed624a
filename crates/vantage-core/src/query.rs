//! Query model: conditions, scoring criteria, and results.
//!
//! A [`Query`] names the cells it wants (conditions), how to rank them
//! (weighted criteria), and how many to return. Kind tags are exhaustive
//! enums so dispatch is checked at compile time; the string boundary used by
//! wire-level callers parses case-insensitively and rejects unknown tags at
//! parse time instead of defaulting silently inside dispatch.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use gridscape::{Bounds, CellCoord, ObjectId};

use crate::params::Params;

/// Normalize a type tag for case-insensitive matching.
fn canonical(tag: &str) -> String {
    tag.chars()
        .filter(|c| *c != '_' && *c != '-' && *c != ' ')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Distance metric used by distance-based conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Straight-line distance
    #[default]
    Euclidean,
    /// Squared straight-line distance (cheap, monotonic)
    SquaredEuclidean,
    /// Sum of per-axis distances
    Manhattan,
    /// Maximum per-axis distance
    Chebyshev,
    /// Distance in the XZ plane only
    Horizontal,
    /// Distance along the Y axis only
    Vertical,
}

impl DistanceMetric {
    /// Parse a metric name, case-insensitive; `None` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match canonical(name).as_str() {
            "euclidean" => Some(Self::Euclidean),
            "squaredeuclidean" | "sqreuclidean" => Some(Self::SquaredEuclidean),
            "manhattan" => Some(Self::Manhattan),
            "chebyshev" => Some(Self::Chebyshev),
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }

    /// Compute the distance between two points under this metric.
    #[must_use]
    pub fn distance(self, a: Vec3, b: Vec3) -> f32 {
        let d = b - a;
        match self {
            Self::Euclidean => d.length(),
            Self::SquaredEuclidean => d.length_squared(),
            Self::Manhattan => d.x.abs() + d.y.abs() + d.z.abs(),
            Self::Chebyshev => d.abs().max_element(),
            Self::Horizontal => (d.x * d.x + d.z * d.z).sqrt(),
            Self::Vertical => d.y.abs(),
        }
    }
}

/// Spatial region restricting which cells a query considers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AreaOfInterest {
    /// Sphere: cells whose center lies within `radius` of `center`
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
    /// Axis-aligned box given by center and full extents
    Box {
        /// Box center
        center: Vec3,
        /// Full box extents
        size: Vec3,
    },
}

impl AreaOfInterest {
    /// Whether a point falls inside the area.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        match self {
            Self::Sphere { center, radius } => center.distance(point) <= *radius,
            Self::Box { center, size } => Bounds::from_center_size(*center, *size).contains(point),
        }
    }
}

/// A named world position evaluators can refer to by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    /// Name used in parameter bags
    pub name: String,
    /// World position
    pub position: Vec3,
}

/// Shared context for a query: named points and an optional area restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Named reference points
    pub reference_points: Vec<ReferencePoint>,
    /// Optional spatial restriction
    pub area_of_interest: Option<AreaOfInterest>,
}

impl QueryContext {
    /// Resolve a point-valued parameter.
    ///
    /// The parameter may be a literal vector (or 3-element list) or the name
    /// of a reference point.
    #[must_use]
    pub fn resolve_point(&self, params: &Params, key: &str) -> Option<Vec3> {
        if let Some(v) = params.get_vec3(key) {
            return Some(v);
        }
        let name = params.get_str(key)?;
        self.reference_points
            .iter()
            .find(|rp| rp.name == name)
            .map(|rp| rp.position)
    }
}

/// Kinds of filtering conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Distance to a target point within bounds
    DistanceTo,
    /// Physical clearance: headroom, lateral room, and solid ground
    Clearance,
    /// Line-of-sight to a target point
    VisibilityOf,
    /// Cell property comparison
    CustomProperty,
    /// Spatial relation to a named world object
    ObjectProximity,
}

impl ConditionKind {
    /// Parse a kind tag, case-insensitive; `None` for unknown tags.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match canonical(tag).as_str() {
            "distanceto" => Some(Self::DistanceTo),
            "clearance" => Some(Self::Clearance),
            "visibilityof" => Some(Self::VisibilityOf),
            "customproperty" => Some(Self::CustomProperty),
            "objectproximity" => Some(Self::ObjectProximity),
            _ => None,
        }
    }

    /// Canonical name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DistanceTo => "DistanceTo",
            Self::Clearance => "Clearance",
            Self::VisibilityOf => "VisibilityOf",
            Self::CustomProperty => "CustomProperty",
            Self::ObjectProximity => "ObjectProximity",
        }
    }
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of scoring criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriterionKind {
    /// Closer to a target point scores higher
    ProximityTo,
    /// Farther from a target point scores higher
    FarthestFrom,
    /// Density of nearby objects, direct or inverted
    DensityOfObjects,
    /// Height relative to a reference elevation
    HeightPreference,
    /// Local ground slope preference
    SlopeAnalysis,
    /// Directional cover from ray probes
    CoverQuality,
    /// Obstruction along a path from a start point
    PathComplexity,
    /// Aggregate distance score over several points
    MultiPoint,
}

impl CriterionKind {
    /// Parse a kind tag, case-insensitive; `None` for unknown tags.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match canonical(tag).as_str() {
            "proximityto" => Some(Self::ProximityTo),
            "farthestfrom" => Some(Self::FarthestFrom),
            "densityofobjects" => Some(Self::DensityOfObjects),
            "heightpreference" => Some(Self::HeightPreference),
            "slopeanalysis" => Some(Self::SlopeAnalysis),
            "coverquality" => Some(Self::CoverQuality),
            "pathcomplexity" => Some(Self::PathComplexity),
            "multipoint" => Some(Self::MultiPoint),
            _ => None,
        }
    }

    /// Canonical name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProximityTo => "ProximityTo",
            Self::FarthestFrom => "FarthestFrom",
            Self::DensityOfObjects => "DensityOfObjects",
            Self::HeightPreference => "HeightPreference",
            Self::SlopeAnalysis => "SlopeAnalysis",
            Self::CoverQuality => "CoverQuality",
            Self::PathComplexity => "PathComplexity",
            Self::MultiPoint => "MultiPoint",
        }
    }
}

impl std::fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filtering condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// What to evaluate
    pub kind: ConditionKind,
    /// Evaluator parameters
    pub params: Params,
    /// XOR the evaluator result
    pub invert: bool,
}

impl Condition {
    /// Create a condition.
    #[must_use]
    pub fn new(kind: ConditionKind, params: Params) -> Self {
        Self {
            kind,
            params,
            invert: false,
        }
    }

    /// Flip the condition's polarity.
    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }
}

/// A weighted scoring criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// What to score
    pub kind: CriterionKind,
    /// Evaluator parameters
    pub params: Params,
    /// Contribution weight in the weighted mean
    pub weight: f32,
}

impl Criterion {
    /// Create a criterion.
    #[must_use]
    pub fn new(kind: CriterionKind, params: Params, weight: f32) -> Self {
        Self {
            kind,
            params,
            weight,
        }
    }
}

/// A complete environment query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Caller-chosen identifier; also the result-cache key
    pub id: String,
    /// Optional dynamic-object type this query is about
    pub target_object_kind: Option<String>,
    /// Maximum number of ranked candidates to return (must be positive)
    pub desired_count: usize,
    /// Named points and optional area restriction
    pub context: QueryContext,
    /// Filtering conditions, evaluated in order with short-circuit AND
    pub conditions: Vec<Condition>,
    /// Weighted scoring criteria
    pub criteria: Vec<Criterion>,
}

impl Query {
    /// Create an empty query returning a single best candidate.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            target_object_kind: None,
            desired_count: 1,
            context: QueryContext::default(),
            conditions: Vec::new(),
            criteria: Vec::new(),
        }
    }

    /// Set the number of candidates to return.
    #[must_use]
    pub fn with_desired_count(mut self, count: usize) -> Self {
        self.desired_count = count;
        self
    }

    /// Set the dynamic-object type this query is about.
    #[must_use]
    pub fn with_target_kind(mut self, kind: &str) -> Self {
        self.target_object_kind = Some(kind.to_string());
        self
    }

    /// Add a named reference point.
    #[must_use]
    pub fn with_reference_point(mut self, name: &str, position: Vec3) -> Self {
        self.context.reference_points.push(ReferencePoint {
            name: name.to_string(),
            position,
        });
        self
    }

    /// Restrict the query to an area of interest.
    #[must_use]
    pub fn with_area_of_interest(mut self, area: AreaOfInterest) -> Self {
        self.context.area_of_interest = Some(area);
        self
    }

    /// Add a condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Add a condition from a wire-level type tag.
    ///
    /// Unknown tags are logged and omitted: in an AND-composed condition
    /// list, omitting is the permissive choice — a typo cannot reject every
    /// candidate.
    #[must_use]
    pub fn with_condition_named(mut self, tag: &str, params: Params, invert: bool) -> Self {
        match ConditionKind::parse(tag) {
            Some(kind) => self.conditions.push(Condition {
                kind,
                params,
                invert,
            }),
            None => warn!(query = %self.id, tag, "unknown condition type; omitted"),
        }
        self
    }

    /// Add a criterion from a wire-level type tag.
    ///
    /// Unknown tags are logged and omitted so they neither bias the weighted
    /// mean nor abort the query.
    #[must_use]
    pub fn with_criterion_named(mut self, tag: &str, params: Params, weight: f32) -> Self {
        match CriterionKind::parse(tag) {
            Some(kind) => self.criteria.push(Criterion {
                kind,
                params,
                weight,
            }),
            None => warn!(query = %self.id, tag, "unknown criterion type; omitted"),
        }
        self
    }
}

/// One ranked world position in a query result.
///
/// Built fresh per execution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    /// World-space position (the cell center)
    pub position: Vec3,
    /// Grid coordinate of the originating cell
    pub coord: Option<CellCoord>,
    /// Final weighted score in [0, 1]
    pub score: f32,
    /// Per-criterion scores keyed by criterion name
    pub breakdown: BTreeMap<String, f32>,
    /// Dynamic objects occupying the originating cell
    pub associated_objects: Vec<ObjectId>,
}

/// Outcome classification for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    /// At least one candidate survived filtering
    Success,
    /// No candidates, or the environment was unavailable
    Failure,
}

/// The result of executing a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Id of the query that produced this result
    pub query_id: String,
    /// Success/failure classification
    pub status: QueryStatus,
    /// Ranked candidates, descending score
    pub results: Vec<LocationCandidate>,
    /// Failure description, when status is `Failure`
    pub error: Option<String>,
    /// Wall-clock execution time in milliseconds
    pub execution_time_ms: f32,
}

impl QueryResult {
    /// Build a successful result.
    #[must_use]
    pub fn success(query_id: &str, results: Vec<LocationCandidate>, elapsed_ms: f32) -> Self {
        Self {
            query_id: query_id.to_string(),
            status: QueryStatus::Success,
            results,
            error: None,
            execution_time_ms: elapsed_ms,
        }
    }

    /// Build a failed result.
    #[must_use]
    pub fn failure(query_id: &str, message: &str, elapsed_ms: f32) -> Self {
        Self {
            query_id: query_id.to_string(),
            status: QueryStatus::Failure,
            results: Vec::new(),
            error: Some(message.to_string()),
            execution_time_ms: elapsed_ms,
        }
    }

    /// Whether the query produced candidates.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    /// The highest-ranked candidate, if any.
    #[must_use]
    pub fn best(&self) -> Option<&LocationCandidate> {
        self.results.first()
    }
}
