//! Diff engine for linearized records.
//!
//! Compares two snapshots of a [`Record`] slot by slot and produces:
//!
//! - a `before` delta holding the previous values of every changed slot,
//! - an `after` delta holding the latest values of every changed slot,
//! - an [`UpdateMask`] describing the change (`ADD` / `REMOVE` / `UPDATE`),
//!   or `None` when the two snapshots are identical.
//!
//! Identity depends on the container: field identifier for records, position
//! for sequences, key for dictionaries.
//!
//! # Key Types
//!
//! - [`RecordDiff`] -- result of [`diff`] / [`diff_with`]
//! - [`DiffConfig`] / [`ShapePolicy`] -- recursion bound and shape-mismatch policy
//!
//! [`Record`]: linearize_types::Record
//! [`UpdateMask`]: linearize_types::UpdateMask

pub mod config;
pub mod dictionary_diff;
pub mod error;
pub mod record_diff;
pub mod sequence_diff;

pub use config::{DiffConfig, ShapePolicy};
pub use error::{DiffError, DiffResult};
pub use record_diff::{diff, diff_optional, diff_with, RecordDiff};
