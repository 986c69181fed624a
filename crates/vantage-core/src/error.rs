//! Error taxonomy for the query engine.

use glam::Vec3;
use thiserror::Error;

use gridscape::GridError;

/// Errors surfaced across the engine boundary.
///
/// Query execution itself never returns one of these: failed queries are
/// encoded in [`QueryResult::status`](crate::query::QueryResult) so callers
/// always receive a structured result. Initialization errors roll the engine
/// back to a clean "no environment" state before they are reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EqsError {
    /// A region size component was zero or negative.
    #[error("invalid region size {size:?}: all components must be positive")]
    InvalidRegion {
        /// The offending size
        size: Vec3,
    },
    /// The requested cell size was zero or negative.
    #[error("invalid cell size {cell_size}: must be positive")]
    InvalidCellSize {
        /// The offending cell size
        cell_size: f32,
    },
    /// A query was attempted with no live environment snapshot.
    ///
    /// Recoverable: the caller should initialize the environment and retry.
    #[error("environment not initialized")]
    NotInitialized,
    /// Environment rebuild failed; the engine holds no snapshot.
    #[error("environment build failed: {0}")]
    Build(String),
}

impl From<GridError> for EqsError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::InvalidRegion { size } => EqsError::InvalidRegion { size },
            GridError::InvalidCellSize { cell_size } => EqsError::InvalidCellSize { cell_size },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_error_conversion() {
        let err: EqsError = GridError::InvalidRegion {
            size: Vec3::new(0.0, 1.0, 1.0),
        }
        .into();
        assert!(matches!(err, EqsError::InvalidRegion { .. }));
        assert!(err.to_string().contains("must be positive"));
    }
}
