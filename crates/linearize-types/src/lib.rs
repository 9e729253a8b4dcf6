//! Foundation types for linearized records.
//!
//! A structured record is flattened into a [`LinearizedValue`] tree whose
//! composite nodes are addressed by a stable identifier:
//!
//! - [`Record`] -- keyed by schema [`FieldId`]
//! - [`Sequence`] -- keyed by position
//! - [`Dictionary`] -- keyed by a [`Scalar`] key, kept in a deterministic order
//!
//! Changes between two trees are described by an [`UpdateMask`], a tree of
//! [`MaskEntry`] operations that mirrors the changed region.

pub mod dictionary;
pub mod error;
pub mod field;
pub mod mask;
pub mod path;
pub mod scalar;
mod unique_map;
pub mod value;

pub use dictionary::{DictEntry, Dictionary};
pub use error::{TypeError, TypeResult};
pub use field::FieldId;
pub use mask::{
    DictMaskEntry, DictionaryMask, MaskEntry, MaskOp, MaskSummary, NestedMask, SequenceMask,
    UpdateMask,
};
pub use path::{PathSegment, ValuePath, DEFAULT_MAX_DEPTH};
pub use scalar::Scalar;
pub use value::{LinearizedValue, Record, Sequence, ValueKind};
