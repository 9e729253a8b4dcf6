//! Positional sequence merge.
//!
//! Masked positions are applied in ascending order. `ADD` and `UPDATE`
//! overwrite an existing position or append at the current length; a
//! position past the end would leave a hole and is rejected. `REMOVE`s must
//! form a trailing run: the sequence is truncated at the lowest removed
//! position, and removing past the end is a no-op.

use tracing::trace;

use linearize_types::{MaskOp, PathSegment, Sequence, SequenceMask};

use crate::error::{MergeError, MergeResult};
use crate::record_merge::Merger;

impl Merger<'_> {
    pub(crate) fn sequence(
        &mut self,
        mask: &SequenceMask,
        current: &mut Sequence,
        diff: &Sequence,
    ) -> MergeResult<()> {
        let truncate_at = self.check_sequence_mask(mask)?;

        for (pos, entry) in mask.iter() {
            let pos = *pos;
            self.descend(PathSegment::Position(pos))?;
            self.check_entry(entry)?;
            if entry.op == MaskOp::Remove {
                self.ascend();
                continue;
            }
            trace!(path = %self.path, op = %entry.op, "applying sequence entry");

            let delta = diff.get(pos).ok_or_else(|| self.missing_delta())?;
            match &entry.nested {
                Some(nested) => {
                    let slot = current.get_mut(pos).ok_or_else(|| MergeError::MissingTarget {
                        path: self.path.clone(),
                        expected: nested.expected_kind(),
                    })?;
                    self.nested(nested, slot, delta)?;
                }
                None => {
                    let len = current.len();
                    if let Some(slot) = current.get_mut(pos) {
                        *slot = delta.clone();
                    } else if pos == len {
                        current.push(delta.clone());
                    } else {
                        return Err(MergeError::SequenceGap {
                            path: self.path.clone(),
                            position: pos,
                            len,
                        });
                    }
                }
            }
            self.ascend();
        }

        if let Some(at) = truncate_at {
            current.truncate(at);
        }
        Ok(())
    }

    /// Validate the mask's removal run and return the truncation point.
    fn check_sequence_mask(&self, mask: &SequenceMask) -> MergeResult<Option<usize>> {
        let first_remove = mask
            .iter()
            .find(|(_, entry)| entry.op == MaskOp::Remove)
            .map(|(pos, _)| *pos);

        let Some(first_remove) = first_remove else {
            return Ok(None);
        };

        if let Some((pos, entry)) = mask
            .iter()
            .find(|(pos, entry)| **pos > first_remove && entry.op != MaskOp::Remove)
        {
            return Err(self.conflict(format!(
                "{} at position {pos} follows REMOVE at position {first_remove}",
                entry.op
            )));
        }

        if mask.iter().any(|(_, entry)| entry.op == MaskOp::Add) {
            return Err(self.conflict("sequence mask both adds and removes"));
        }

        Ok(Some(first_remove))
    }
}
