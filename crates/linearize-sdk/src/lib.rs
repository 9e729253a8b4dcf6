//! High-level API for linearized records.
//!
//! Bundles the value model, the diff and merge engines and the object
//! adapter behind one dependency. The main entry point is [`Patch`]: the
//! delta pair and mask between two snapshots, which can be applied to a
//! current record or object, reverted, and shipped as JSON.

pub mod config;
pub mod error;
pub mod patch;

pub use config::EngineConfig;
pub use error::{SdkError, SdkResult};
pub use patch::Patch;

// Re-export the engine APIs
pub use linearize_diff::{diff, diff_optional, diff_with, DiffConfig, DiffError, RecordDiff, ShapePolicy};
pub use linearize_merge::{merge, merge_in_place, merge_in_place_with, merge_with, MergeConfig, MergeError};
pub use linearize_object::{
    convert, linearize, unlinearize, unlinearize_into, AdapterError, FieldDescriptor, FieldKind,
    FromScalar, IntoScalar, MessageDescriptor, Schema,
};
pub use linearize_types::{
    DictEntry, DictMaskEntry, Dictionary, DictionaryMask, FieldId, LinearizedValue, MaskEntry,
    MaskOp, MaskSummary, NestedMask, PathSegment, Record, Scalar, Sequence, SequenceMask,
    TypeError, UpdateMask, ValueKind, ValuePath,
};
