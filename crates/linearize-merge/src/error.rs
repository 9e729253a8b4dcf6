use thiserror::Error;

use linearize_types::{ValueKind, ValuePath};

/// Errors produced while applying a mask.
///
/// Every variant means the mask does not fit the tree it is applied to; none
/// of them is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    /// A nested mask expects a composite of one kind but the current tree
    /// holds another.
    #[error("shape mismatch at {path}: mask expects {expected}, current holds {found}")]
    ShapeMismatch {
        path: ValuePath,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A nested mask points at a slot the current tree does not have.
    #[error("missing target at {path}: mask expects {expected}, current slot is absent")]
    MissingTarget { path: ValuePath, expected: ValueKind },

    /// The delta tree holds the wrong kind of value under a nested mask.
    #[error("delta shape mismatch at {path}: mask expects {expected}, delta holds {found}")]
    DeltaShapeMismatch {
        path: ValuePath,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A masked `ADD`/`UPDATE` slot has no value in the delta tree.
    #[error("missing delta value at {path}")]
    MissingDelta { path: ValuePath },

    /// The mask is internally inconsistent.
    #[error("conflicting operations at {path}: {reason}")]
    ConflictingOperations { path: ValuePath, reason: String },

    /// A sequence `ADD` would leave a hole before the new element.
    #[error("sequence gap at {path}: cannot place position {position} into length {len}")]
    SequenceGap {
        path: ValuePath,
        position: usize,
        len: usize,
    },

    /// The mask nests deeper than the configured bound.
    #[error("depth limit of {limit} exceeded at {path}")]
    DepthLimitExceeded { path: ValuePath, limit: usize },
}

pub type MergeResult<T> = Result<T, MergeError>;
