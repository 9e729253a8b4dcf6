use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a record field.
///
/// Field identifiers are assigned by the external schema (for generated
/// message types, the declared field number), never by declaration order.
/// The same identifier denotes the same logical slot in every snapshot of a
/// record, which makes it the unit of identity when diffing records.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(u32);

impl FieldId {
    /// Create a field identifier from its raw number.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw field number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({})", self.0)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<FieldId> for u32 {
    fn from(id: FieldId) -> Self {
        id.0
    }
}
