//! Merge engine for linearized records.
//!
//! Applies an [`UpdateMask`] and a delta tree (the `after` side of a diff, or
//! any tree holding the right values at the masked slots) onto a current
//! record. The walk mirrors the mask exactly: unmasked slots are never
//! touched and the unmasked parts of the delta are never read.
//!
//! Merging is idempotent: applying the same mask and delta twice yields the
//! same record as applying them once, so patches may be delivered
//! at-least-once.
//!
//! Two entry points are provided:
//!
//! - [`merge`] -- returns a new record; `current` is left intact even when
//!   the merge fails.
//! - [`merge_in_place`] -- mutates `current`; after an error the target is
//!   partially updated and must be discarded.
//!
//! [`UpdateMask`]: linearize_types::UpdateMask

pub mod config;
pub mod dictionary_merge;
pub mod error;
pub mod record_merge;
pub mod sequence_merge;

pub use config::MergeConfig;
pub use error::{MergeError, MergeResult};
pub use record_merge::{merge, merge_in_place, merge_in_place_with, merge_with};
