use thiserror::Error;

use crate::field::FieldId;
use crate::value::ValueKind;

/// Errors produced by value model operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: ValueKind, found: ValueKind },

    #[error("duplicate field identifier {0} in record")]
    DuplicateField(FieldId),

    #[error("duplicate sequence position {0} in mask")]
    DuplicatePosition(usize),

    #[error("duplicate dictionary key {0}")]
    DuplicateKey(String),
}

/// Convenience alias for value model results.
pub type TypeResult<T> = Result<T, TypeError>;
