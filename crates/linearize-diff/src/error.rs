//! Error types for the diff crate.

use linearize_types::{ValueKind, ValuePath};

/// Errors that can occur while diffing two snapshots.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiffError {
    /// The two snapshots hold different shapes at the same slot and the
    /// configured [`ShapePolicy`](crate::ShapePolicy) rejects that.
    #[error("shape mismatch at {path}: previous is {previous}, latest is {latest}")]
    ShapeMismatch {
        path: ValuePath,
        previous: ValueKind,
        latest: ValueKind,
    },

    /// The trees nest deeper than the configured bound.
    #[error("depth limit of {limit} exceeded at {path}")]
    DepthLimitExceeded { path: ValuePath, limit: usize },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
