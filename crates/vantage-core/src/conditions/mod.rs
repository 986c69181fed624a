//! Condition evaluators.
//!
//! Each condition kind has a pure evaluator: cell in, boolean out. Dispatch
//! is an exhaustive `match` over [`ConditionKind`] — adding a kind without an
//! evaluator is a compile error, and there is no silent default branch.
//! Missing or malformed parameters degrade per-kind (documented on each
//! evaluator) and never panic.

mod clearance;
mod distance;
mod object;
mod property;
mod visibility;

use gridscape::Cell;

use crate::query::{Condition, ConditionKind};
use crate::view::QueryView;

/// Evaluate a condition against a cell.
///
/// The evaluator's verdict is XOR'd with the condition's `invert` flag, so
/// an inverted condition passes exactly the cells its plain form rejects.
#[must_use]
pub fn evaluate(cell: &Cell, condition: &Condition, view: &QueryView) -> bool {
    let verdict = match condition.kind {
        ConditionKind::DistanceTo => distance::evaluate(cell, &condition.params, view),
        ConditionKind::Clearance => clearance::evaluate(cell, &condition.params, view),
        ConditionKind::VisibilityOf => visibility::evaluate(cell, &condition.params, view),
        ConditionKind::CustomProperty => property::evaluate(cell, &condition.params, view),
        ConditionKind::ObjectProximity => object::evaluate(cell, &condition.params, view),
    };
    verdict ^ condition.invert
}
