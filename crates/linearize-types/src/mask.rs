//! Update masks: hierarchical descriptions of what changed between two trees.
//!
//! A mask mirrors the changed region of a [`LinearizedValue`] tree. Every
//! masked slot carries exactly one [`MaskOp`]. An `Update` of a composite
//! value carries a [`NestedMask`] whose variant names the composite kind the
//! slot is expected to hold; an `Update` of a scalar (or a full replacement)
//! carries none, and the new value is read from the accompanying delta tree.
//!
//! [`LinearizedValue`]: crate::LinearizedValue

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::dictionary::KeyOrder;
use crate::error::{TypeError, TypeResult};
use crate::field::FieldId;
use crate::scalar::Scalar;
use crate::unique_map;
use crate::value::ValueKind;

/// The operation recorded for a single slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskOp {
    /// Present in `after` but not in `before`.
    Add,
    /// Present in `before` but not in `after`.
    Remove,
    /// Present on both sides with differing values.
    Update,
}

impl MaskOp {
    /// The operation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Self::Add => Self::Remove,
            Self::Remove => Self::Add,
            Self::Update => Self::Update,
        }
    }
}

impl fmt::Display for MaskOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Remove => write!(f, "REMOVE"),
            Self::Update => write!(f, "UPDATE"),
        }
    }
}

/// A masked slot: an operation plus, for composite updates, a nested mask.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskEntry {
    pub op: MaskOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<NestedMask>,
}

impl MaskEntry {
    pub fn add() -> Self {
        Self {
            op: MaskOp::Add,
            nested: None,
        }
    }

    pub fn remove() -> Self {
        Self {
            op: MaskOp::Remove,
            nested: None,
        }
    }

    /// An update replacing the whole slot value.
    pub fn update() -> Self {
        Self {
            op: MaskOp::Update,
            nested: None,
        }
    }

    /// An update descending into a composite value.
    pub fn update_nested(nested: impl Into<NestedMask>) -> Self {
        Self {
            op: MaskOp::Update,
            nested: Some(nested.into()),
        }
    }

    pub fn inverse(&self) -> Self {
        Self {
            op: self.op.inverse(),
            nested: self.nested.as_ref().map(NestedMask::inverse),
        }
    }

    fn accumulate(&self, summary: &mut MaskSummary) {
        match (&self.op, &self.nested) {
            (_, Some(nested)) => nested.accumulate(summary),
            (MaskOp::Add, None) => summary.additions += 1,
            (MaskOp::Remove, None) => summary.removals += 1,
            (MaskOp::Update, None) => summary.updates += 1,
        }
    }
}

/// Leaf operation counts of a mask tree.
///
/// Composite updates are not counted themselves; their nested operations are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskSummary {
    pub additions: usize,
    pub removals: usize,
    pub updates: usize,
}

impl MaskSummary {
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.updates
    }
}

// ---------------------------------------------------------------
// Record mask
// ---------------------------------------------------------------

/// Record-level mask keyed by field identifier.
///
/// This is the top-level mask produced by a record diff and consumed by a
/// record merge.
///
/// Deserialization rejects a repeated identifier with
/// [`TypeError::DuplicateField`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UpdateMask {
    entries: BTreeMap<FieldId, MaskEntry>,
}

impl<'de> Deserialize<'de> for UpdateMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        unique_map::deserialize(deserializer, TypeError::DuplicateField).map(|entries| Self { entries })
    }
}

impl UpdateMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<FieldId>, entry: MaskEntry) -> Self {
        self.insert(id, entry);
        self
    }

    pub fn insert(&mut self, id: impl Into<FieldId>, entry: MaskEntry) -> Option<MaskEntry> {
        self.entries.insert(id.into(), entry)
    }

    pub fn get(&self, id: FieldId) -> Option<&MaskEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FieldId, MaskEntry> {
        self.entries.iter()
    }

    /// Recursive leaf operation counts.
    pub fn summary(&self) -> MaskSummary {
        let mut summary = MaskSummary::default();
        self.accumulate(&mut summary);
        summary
    }

    /// The mask that maps the `after` side back onto the `before` side.
    pub fn inverse(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(id, entry)| (*id, entry.inverse()))
                .collect(),
        }
    }

    fn accumulate(&self, summary: &mut MaskSummary) {
        for entry in self.entries.values() {
            entry.accumulate(summary);
        }
    }
}

impl FromIterator<(FieldId, MaskEntry)> for UpdateMask {
    fn from_iter<I: IntoIterator<Item = (FieldId, MaskEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UpdateMask {
    type Item = (&'a FieldId, &'a MaskEntry);
    type IntoIter = btree_map::Iter<'a, FieldId, MaskEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------
// Sequence mask
// ---------------------------------------------------------------

/// Sequence-level mask keyed by position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SequenceMask {
    entries: BTreeMap<usize, MaskEntry>,
}

impl<'de> Deserialize<'de> for SequenceMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        unique_map::deserialize(deserializer, TypeError::DuplicatePosition)
            .map(|entries| Self { entries })
    }
}

impl SequenceMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, position: usize, entry: MaskEntry) -> Self {
        self.insert(position, entry);
        self
    }

    pub fn insert(&mut self, position: usize, entry: MaskEntry) -> Option<MaskEntry> {
        self.entries.insert(position, entry)
    }

    pub fn get(&self, position: usize) -> Option<&MaskEntry> {
        self.entries.get(&position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending position order.
    pub fn iter(&self) -> btree_map::Iter<'_, usize, MaskEntry> {
        self.entries.iter()
    }

    pub fn summary(&self) -> MaskSummary {
        let mut summary = MaskSummary::default();
        self.accumulate(&mut summary);
        summary
    }

    pub fn inverse(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(pos, entry)| (*pos, entry.inverse()))
                .collect(),
        }
    }

    fn accumulate(&self, summary: &mut MaskSummary) {
        for entry in self.entries.values() {
            entry.accumulate(summary);
        }
    }
}

// ---------------------------------------------------------------
// Dictionary mask
// ---------------------------------------------------------------

/// One keyed entry of a [`DictionaryMask`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictMaskEntry {
    pub key: Scalar,
    pub entry: MaskEntry,
}

/// Dictionary-level mask keyed by scalar key, in dictionary order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DictMaskEntry>", into = "Vec<DictMaskEntry>")]
pub struct DictionaryMask {
    entries: Vec<DictMaskEntry>,
}

impl DictionaryMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<Scalar>, entry: MaskEntry) -> Self {
        self.insert(key, entry);
        self
    }

    /// Insert an entry, replacing any entry already recorded for `key`.
    pub fn insert(&mut self, key: impl Into<Scalar>, entry: MaskEntry) -> Option<MaskEntry> {
        let key = key.into();
        match self.position(&key) {
            Ok(idx) => Some(std::mem::replace(&mut self.entries[idx].entry, entry)),
            Err(idx) => {
                self.entries.insert(idx, DictMaskEntry { key, entry });
                None
            }
        }
    }

    pub fn get(&self, key: &Scalar) -> Option<&MaskEntry> {
        self.position(key).ok().map(|idx| &self.entries[idx].entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &MaskEntry)> {
        self.entries.iter().map(|e| (&e.key, &e.entry))
    }

    pub fn summary(&self) -> MaskSummary {
        let mut summary = MaskSummary::default();
        self.accumulate(&mut summary);
        summary
    }

    pub fn inverse(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|e| DictMaskEntry {
                    key: e.key.clone(),
                    entry: e.entry.inverse(),
                })
                .collect(),
        }
    }

    fn accumulate(&self, summary: &mut MaskSummary) {
        for e in &self.entries {
            e.entry.accumulate(summary);
        }
    }

    fn position(&self, key: &Scalar) -> Result<usize, usize> {
        let target = KeyOrder::of(key);
        self.entries
            .binary_search_by(|e| KeyOrder::of(&e.key).cmp(&target))
    }
}

impl TryFrom<Vec<DictMaskEntry>> for DictionaryMask {
    type Error = TypeError;

    fn try_from(entries: Vec<DictMaskEntry>) -> TypeResult<Self> {
        let mut mask = Self::new();
        for e in entries {
            if mask.insert(e.key.clone(), e.entry).is_some() {
                return Err(TypeError::DuplicateKey(e.key.to_string()));
            }
        }
        Ok(mask)
    }
}

impl From<DictionaryMask> for Vec<DictMaskEntry> {
    fn from(mask: DictionaryMask) -> Self {
        mask.entries
    }
}

// ---------------------------------------------------------------
// Nested mask
// ---------------------------------------------------------------

/// Mask for the inside of a composite slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NestedMask {
    Record(UpdateMask),
    Sequence(SequenceMask),
    Dictionary(DictionaryMask),
}

impl NestedMask {
    /// The composite kind this mask expects the current-side value to have.
    pub fn expected_kind(&self) -> ValueKind {
        match self {
            Self::Record(_) => ValueKind::Record,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Record(m) => m.is_empty(),
            Self::Sequence(m) => m.is_empty(),
            Self::Dictionary(m) => m.is_empty(),
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            Self::Record(m) => Self::Record(m.inverse()),
            Self::Sequence(m) => Self::Sequence(m.inverse()),
            Self::Dictionary(m) => Self::Dictionary(m.inverse()),
        }
    }

    fn accumulate(&self, summary: &mut MaskSummary) {
        match self {
            Self::Record(m) => m.accumulate(summary),
            Self::Sequence(m) => m.accumulate(summary),
            Self::Dictionary(m) => m.accumulate(summary),
        }
    }
}

impl From<UpdateMask> for NestedMask {
    fn from(m: UpdateMask) -> Self {
        Self::Record(m)
    }
}

impl From<SequenceMask> for NestedMask {
    fn from(m: SequenceMask) -> Self {
        Self::Sequence(m)
    }
}

impl From<DictionaryMask> for NestedMask {
    fn from(m: DictionaryMask) -> Self {
        Self::Dictionary(m)
    }
}
