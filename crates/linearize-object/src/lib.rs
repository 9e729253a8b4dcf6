//! Object adapter for linearized records.
//!
//! Application structs opt in by implementing [`Schema`]: a static
//! [`MessageDescriptor`] listing each field's identifier, name and
//! [`FieldKind`], plus per-field getters and setters expressed in terms of
//! [`LinearizedValue`]. The [`convert`] module provides the conversions those
//! implementations need.
//!
//! - [`linearize`] -- object to [`Record`]; an absent object is the empty record
//! - [`unlinearize`] / [`unlinearize_into`] -- [`Record`] back to an object
//!
//! [`LinearizedValue`]: linearize_types::LinearizedValue
//! [`Record`]: linearize_types::Record

pub mod adapter;
pub mod convert;
pub mod error;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

pub use adapter::{linearize, unlinearize, unlinearize_into};
pub use convert::{FromScalar, IntoScalar};
pub use error::{AdapterError, AdapterResult};
pub use schema::{FieldDescriptor, FieldKind, MessageDescriptor, Schema};
