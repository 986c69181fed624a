//! CustomProperty: compare a cell property against an expected value.

use gridscape::Cell;
use tracing::warn;

use crate::params::Params;
use crate::view::QueryView;

/// Parameters: `propertyName` (required), `expectedValue` (required),
/// `operator` (`equals` | `contains`, default `equals`).
///
/// A missing parameter or an absent property fails the condition. An
/// unknown operator passes — matching the permissive contract for operator
/// typos — with a warning.
pub(super) fn evaluate(cell: &Cell, params: &Params, _view: &QueryView) -> bool {
    let Some(name) = params.get_str("propertyName") else {
        warn!(kind = "CustomProperty", "missing propertyName; condition fails");
        return false;
    };
    let Some(expected) = params.get("expectedValue") else {
        warn!(kind = "CustomProperty", "missing expectedValue; condition fails");
        return false;
    };
    let Some(actual) = cell.property(name) else {
        return false;
    };

    let operator = params.get_str("operator").unwrap_or("equals");
    match operator.to_ascii_lowercase().as_str() {
        "equals" => actual.loose_eq(expected),
        "contains" => actual.contains(expected),
        other => {
            warn!(kind = "CustomProperty", operator = other, "unknown operator; condition passes");
            true
        }
    }
}
