//! Record-level diff and the shape dispatch shared by every container kind.
//!
//! For each field identifier:
//!
//! - present only in `previous` -- `REMOVE`; the value goes to `before` only
//! - present only in `latest` -- `ADD`; the value goes to `after` only
//! - present in both and different -- `UPDATE`, with a nested mask when both
//!   values are composites of the same kind
//!
//! A removed or added subtree is never descended into: the whole value is the
//! unit of change.

use tracing::debug;

use linearize_types::{
    LinearizedValue, MaskEntry, NestedMask, PathSegment, Record, UpdateMask, ValuePath,
};

use crate::config::{DiffConfig, ShapePolicy};
use crate::error::{DiffError, DiffResult};

/// The result of comparing two record snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordDiff {
    /// Previous values of every changed field. Added fields are absent.
    pub before: Record,
    /// Latest values of every changed field. Removed fields are absent.
    pub after: Record,
    /// `None` iff the snapshots are identical at every field.
    pub mask: Option<UpdateMask>,
}

impl RecordDiff {
    /// Returns `true` if the two snapshots were identical.
    pub fn is_unchanged(&self) -> bool {
        self.mask.is_none()
    }
}

/// Compare two record snapshots using the default configuration.
pub fn diff(previous: &Record, latest: &Record) -> DiffResult<RecordDiff> {
    diff_with(&DiffConfig::default(), previous, latest)
}

/// Compare two snapshots where either may be absent.
///
/// An absent record is treated as the empty record, so diffing `None`
/// against a populated record yields an `ADD` for each of its fields.
pub fn diff_optional(previous: Option<&Record>, latest: Option<&Record>) -> DiffResult<RecordDiff> {
    let empty = Record::new();
    diff(previous.unwrap_or(&empty), latest.unwrap_or(&empty))
}

/// Compare two record snapshots.
pub fn diff_with(config: &DiffConfig, previous: &Record, latest: &Record) -> DiffResult<RecordDiff> {
    let mut differ = Differ::new(config);
    let (before, after, mask) = differ.records(previous, latest)?;

    if mask.is_empty() {
        debug!("record diff: no changes");
        return Ok(RecordDiff::default());
    }

    let summary = mask.summary();
    debug!(
        fields = mask.len(),
        additions = summary.additions,
        removals = summary.removals,
        updates = summary.updates,
        "record diff computed"
    );

    Ok(RecordDiff {
        before,
        after,
        mask: Some(mask),
    })
}

/// A changed slot: both sides' delta values and, for same-kind composites,
/// the nested mask.
pub(crate) struct Change {
    pub before: LinearizedValue,
    pub after: LinearizedValue,
    pub nested: Option<NestedMask>,
}

impl Change {
    pub(crate) fn into_entry(self) -> (LinearizedValue, LinearizedValue, MaskEntry) {
        let entry = match self.nested {
            Some(nested) => MaskEntry::update_nested(nested),
            None => MaskEntry::update(),
        };
        (self.before, self.after, entry)
    }
}

/// Recursive walker. Tracks the current path for error reporting and the
/// depth bound.
pub(crate) struct Differ<'c> {
    config: &'c DiffConfig,
    path: ValuePath,
}

impl<'c> Differ<'c> {
    pub(crate) fn new(config: &'c DiffConfig) -> Self {
        Self {
            config,
            path: ValuePath::root(),
        }
    }

    pub(crate) fn descend(&mut self, segment: PathSegment) -> DiffResult<()> {
        self.path.push(segment);
        if self.path.depth() > self.config.max_depth {
            return Err(DiffError::DepthLimitExceeded {
                path: self.path.clone(),
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.path.pop();
    }

    /// Diff two records field by field.
    pub(crate) fn records(
        &mut self,
        previous: &Record,
        latest: &Record,
    ) -> DiffResult<(Record, Record, UpdateMask)> {
        let mut before = Record::new();
        let mut after = Record::new();
        let mut mask = UpdateMask::new();

        // Removed and changed fields.
        for (id, prev_value) in previous {
            match latest.get(*id) {
                None => {
                    before.insert(*id, prev_value.clone());
                    mask.insert(*id, MaskEntry::remove());
                }
                Some(latest_value) => {
                    self.descend(PathSegment::Field(*id))?;
                    let change = self.compare(prev_value, latest_value)?;
                    self.ascend();
                    if let Some(change) = change {
                        let (b, a, entry) = change.into_entry();
                        before.insert(*id, b);
                        after.insert(*id, a);
                        mask.insert(*id, entry);
                    }
                }
            }
        }

        // Added fields.
        for (id, latest_value) in latest {
            if !previous.contains(*id) {
                after.insert(*id, latest_value.clone());
                mask.insert(*id, MaskEntry::add());
            }
        }

        Ok((before, after, mask))
    }

    /// Compare two values present at the same slot.
    ///
    /// Returns `None` when they are equal.
    pub(crate) fn compare(
        &mut self,
        previous: &LinearizedValue,
        latest: &LinearizedValue,
    ) -> DiffResult<Option<Change>> {
        use LinearizedValue as V;

        match (previous, latest) {
            (V::Scalar(p), V::Scalar(l)) => {
                if p == l {
                    Ok(None)
                } else {
                    Ok(Some(Change {
                        before: previous.clone(),
                        after: latest.clone(),
                        nested: None,
                    }))
                }
            }
            (V::Record(p), V::Record(l)) => {
                let (before, after, mask) = self.records(p, l)?;
                Ok(nested_change(before.into(), after.into(), mask.is_empty(), mask.into()))
            }
            (V::Sequence(p), V::Sequence(l)) => {
                let (before, after, mask) = self.sequences(p, l)?;
                Ok(nested_change(before.into(), after.into(), mask.is_empty(), mask.into()))
            }
            (V::Dictionary(p), V::Dictionary(l)) => {
                let (before, after, mask) = self.dictionaries(p, l)?;
                Ok(nested_change(before.into(), after.into(), mask.is_empty(), mask.into()))
            }
            _ => match self.config.shape_policy {
                ShapePolicy::Replace => Ok(Some(Change {
                    before: previous.clone(),
                    after: latest.clone(),
                    nested: None,
                })),
                ShapePolicy::Reject => Err(DiffError::ShapeMismatch {
                    path: self.path.clone(),
                    previous: previous.kind(),
                    latest: latest.kind(),
                }),
            },
        }
    }
}

fn nested_change(
    before: LinearizedValue,
    after: LinearizedValue,
    unchanged: bool,
    nested: NestedMask,
) -> Option<Change> {
    if unchanged {
        None
    } else {
        Some(Change {
            before,
            after,
            nested: Some(nested),
        })
    }
}
