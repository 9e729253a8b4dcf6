use thiserror::Error;

use linearize_types::{FieldId, TypeError, ValueKind};

use crate::schema::FieldKind;

/// Errors crossing the object boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// The record holds an identifier the message does not declare.
    #[error("unknown field {id} for message {message}")]
    UnknownField { message: &'static str, id: FieldId },

    /// A field value does not have the shape its descriptor declares.
    #[error("field {message}.{field} is declared {expected}, found {found}")]
    ShapeMismatch {
        message: &'static str,
        field: &'static str,
        expected: FieldKind,
        found: ValueKind,
    },

    /// A scalar holds a different variant than the target type accepts.
    #[error("scalar mismatch: expected {expected}, found {found}")]
    ScalarMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A numeric scalar does not fit the target type.
    #[error("value {value} out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error(transparent)]
    Type(#[from] TypeError),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
