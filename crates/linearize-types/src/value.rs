//! The tagged-union tree every diff and merge operates on.
//!
//! [`LinearizedValue`] is a closed set of variants. Composite nodes differ in
//! what identifies a child slot across two snapshots:
//!
//! | node | identity |
//! |---|---|
//! | [`Record`] | schema [`FieldId`] |
//! | [`Sequence`] | position |
//! | [`Dictionary`] | scalar key |
//!
//! Sequences have no element-level key: reordering a sequence is observed as
//! a series of positional updates, never as a move.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::dictionary::Dictionary;
use crate::error::{TypeError, TypeResult};
use crate::field::FieldId;
use crate::scalar::Scalar;
use crate::unique_map;

/// The shape of a [`LinearizedValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Scalar,
    Record,
    Sequence,
    Dictionary,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Record => write!(f, "record"),
            Self::Sequence => write!(f, "sequence"),
            Self::Dictionary => write!(f, "dictionary"),
        }
    }
}

/// A node of a linearized tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinearizedValue {
    Scalar(Scalar),
    Record(Record),
    Sequence(Sequence),
    Dictionary(Dictionary),
}

impl LinearizedValue {
    /// The shape of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::Record(_) => ValueKind::Record,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    /// Returns `true` for `Record`, `Sequence` and `Dictionary`.
    pub fn is_composite(&self) -> bool {
        !self.is_scalar()
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub fn is_dictionary(&self) -> bool {
        matches!(self, Self::Dictionary(_))
    }

    pub fn as_scalar(&self) -> TypeResult<&Scalar> {
        match self {
            Self::Scalar(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Scalar)),
        }
    }

    pub fn as_record(&self) -> TypeResult<&Record> {
        match self {
            Self::Record(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Record)),
        }
    }

    pub fn as_sequence(&self) -> TypeResult<&Sequence> {
        match self {
            Self::Sequence(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Sequence)),
        }
    }

    pub fn as_dictionary(&self) -> TypeResult<&Dictionary> {
        match self {
            Self::Dictionary(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Dictionary)),
        }
    }

    pub fn as_record_mut(&mut self) -> TypeResult<&mut Record> {
        match self {
            Self::Record(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Record)),
        }
    }

    pub fn as_sequence_mut(&mut self) -> TypeResult<&mut Sequence> {
        match self {
            Self::Sequence(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Sequence)),
        }
    }

    pub fn as_dictionary_mut(&mut self) -> TypeResult<&mut Dictionary> {
        match self {
            Self::Dictionary(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Dictionary)),
        }
    }

    pub fn into_scalar(self) -> TypeResult<Scalar> {
        match self {
            Self::Scalar(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Scalar)),
        }
    }

    pub fn into_record(self) -> TypeResult<Record> {
        match self {
            Self::Record(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Record)),
        }
    }

    pub fn into_sequence(self) -> TypeResult<Sequence> {
        match self {
            Self::Sequence(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Sequence)),
        }
    }

    pub fn into_dictionary(self) -> TypeResult<Dictionary> {
        match self {
            Self::Dictionary(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Dictionary)),
        }
    }

    fn mismatch(&self, expected: ValueKind) -> TypeError {
        TypeError::ShapeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl From<Scalar> for LinearizedValue {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<Record> for LinearizedValue {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

impl From<Sequence> for LinearizedValue {
    fn from(v: Sequence) -> Self {
        Self::Sequence(v)
    }
}

impl From<Dictionary> for LinearizedValue {
    fn from(v: Dictionary) -> Self {
        Self::Dictionary(v)
    }
}

macro_rules! scalar_into_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for LinearizedValue {
                fn from(v: $t) -> Self {
                    Self::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

scalar_into_value!(bool, i32, i64, u32, u64, f32, f64, &str, String, Vec<u8>);

// ---------------------------------------------------------------
// Record
// ---------------------------------------------------------------

/// Identifier-keyed composite node: a flattened structured object.
///
/// Field identifiers are unique by construction; iteration is in ascending
/// identifier order. An identifier that is not a member of the record is
/// *absent*, which is distinct from a member holding an empty composite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<FieldId, LinearizedValue>,
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        unique_map::deserialize(deserializer, TypeError::DuplicateField).map(|fields| Self { fields })
    }
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record, rejecting duplicate identifiers.
    pub fn try_from_fields<I>(fields: I) -> TypeResult<Self>
    where
        I: IntoIterator<Item = (FieldId, LinearizedValue)>,
    {
        let mut record = Self::new();
        for (id, value) in fields {
            if record.fields.insert(id, value).is_some() {
                return Err(TypeError::DuplicateField(id));
            }
        }
        Ok(record)
    }

    /// Builder-style insert.
    pub fn with(mut self, id: impl Into<FieldId>, value: impl Into<LinearizedValue>) -> Self {
        self.insert(id, value);
        self
    }

    /// Insert a field, returning the previous value at that identifier.
    pub fn insert(
        &mut self,
        id: impl Into<FieldId>,
        value: impl Into<LinearizedValue>,
    ) -> Option<LinearizedValue> {
        self.fields.insert(id.into(), value.into())
    }

    pub fn get(&self, id: FieldId) -> Option<&LinearizedValue> {
        self.fields.get(&id)
    }

    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut LinearizedValue> {
        self.fields.get_mut(&id)
    }

    pub fn remove(&mut self, id: FieldId) -> Option<LinearizedValue> {
        self.fields.remove(&id)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.fields.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in ascending identifier order.
    pub fn iter(&self) -> btree_map::Iter<'_, FieldId, LinearizedValue> {
        self.fields.iter()
    }

    /// Field identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.keys().copied()
    }
}

impl FromIterator<(FieldId, LinearizedValue)> for Record {
    /// Later entries win on duplicate identifiers; use
    /// [`Record::try_from_fields`] to reject them instead.
    fn from_iter<I: IntoIterator<Item = (FieldId, LinearizedValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (FieldId, LinearizedValue);
    type IntoIter = btree_map::IntoIter<FieldId, LinearizedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a FieldId, &'a LinearizedValue);
    type IntoIter = btree_map::Iter<'a, FieldId, LinearizedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// ---------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------

/// Position-keyed composite node: a repeated field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    items: Vec<LinearizedValue>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&LinearizedValue> {
        self.items.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut LinearizedValue> {
        self.items.get_mut(position)
    }

    pub fn push(&mut self, value: impl Into<LinearizedValue>) {
        self.items.push(value.into());
    }

    /// Drop every element at or beyond `len`.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinearizedValue> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[LinearizedValue] {
        &self.items
    }
}

impl From<Vec<LinearizedValue>> for Sequence {
    fn from(items: Vec<LinearizedValue>) -> Self {
        Self { items }
    }
}

impl<T: Into<LinearizedValue>> FromIterator<T> for Sequence {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for Sequence {
    type Item = LinearizedValue;
    type IntoIter = std::vec::IntoIter<LinearizedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a LinearizedValue;
    type IntoIter = std::slice::Iter<'a, LinearizedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
