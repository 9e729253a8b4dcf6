//! Positional sequence diff.
//!
//! Position is the only identity a sequence element has. Positions below the
//! shorter length are compared recursively; positions that exist only in the
//! longer sequence are `ADD`s (growth) or `REMOVE`s (shrink), one per
//! position. Those trailing positions are never compared against a missing
//! value, and growth never shifts earlier positions.
//!
//! Sequence deltas carry the complete sequence of their side, with every
//! changed position replaced by that element's own delta, so that masked
//! positions can be read back by index.

use linearize_types::{MaskEntry, PathSegment, Sequence, SequenceMask};

use crate::error::DiffResult;
use crate::record_diff::Differ;

impl Differ<'_> {
    pub(crate) fn sequences(
        &mut self,
        previous: &Sequence,
        latest: &Sequence,
    ) -> DiffResult<(Sequence, Sequence, SequenceMask)> {
        let mut before = previous.clone();
        let mut after = latest.clone();
        let mut mask = SequenceMask::new();

        let common = previous.len().min(latest.len());
        for (pos, (prev_elem, latest_elem)) in previous.iter().zip(latest.iter()).enumerate() {
            self.descend(PathSegment::Position(pos))?;
            let change = self.compare(prev_elem, latest_elem)?;
            self.ascend();

            if let Some(change) = change {
                let (b, a, entry) = change.into_entry();
                if let Some(slot) = before.get_mut(pos) {
                    *slot = b;
                }
                if let Some(slot) = after.get_mut(pos) {
                    *slot = a;
                }
                mask.insert(pos, entry);
            }
        }

        // Growth: one ADD per appended position.
        for pos in common..latest.len() {
            mask.insert(pos, MaskEntry::add());
        }

        // Shrink: one REMOVE per dropped position.
        for pos in common..previous.len() {
            mask.insert(pos, MaskEntry::remove());
        }

        Ok((before, after, mask))
    }
}
