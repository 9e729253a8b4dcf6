//! Key-addressed dictionary merge.

use tracing::trace;

use linearize_types::{Dictionary, DictionaryMask, MaskOp, PathSegment};

use crate::error::{MergeError, MergeResult};
use crate::record_merge::Merger;

impl Merger<'_> {
    pub(crate) fn dictionary(
        &mut self,
        mask: &DictionaryMask,
        current: &mut Dictionary,
        diff: &Dictionary,
    ) -> MergeResult<()> {
        for (key, entry) in mask.iter() {
            self.descend(PathSegment::Key(key.clone()))?;
            self.check_entry(entry)?;
            trace!(path = %self.path, op = %entry.op, "applying dictionary entry");

            match (entry.op, &entry.nested) {
                (MaskOp::Remove, _) => {
                    current.remove(key);
                }
                (_, None) => {
                    let value = diff.get(key).ok_or_else(|| self.missing_delta())?;
                    current.insert(key.clone(), value.clone());
                }
                (_, Some(nested)) => {
                    let delta = diff.get(key).ok_or_else(|| self.missing_delta())?;
                    let slot = current.get_mut(key).ok_or_else(|| MergeError::MissingTarget {
                        path: self.path.clone(),
                        expected: nested.expected_kind(),
                    })?;
                    self.nested(nested, slot, delta)?;
                }
            }
            self.ascend();
        }
        Ok(())
    }
}
