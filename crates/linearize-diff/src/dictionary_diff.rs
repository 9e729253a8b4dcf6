//! Key-addressed dictionary diff.
//!
//! Keys present only in `previous` are `REMOVE`d, keys present only in
//! `latest` are `ADD`ed, and keys present in both are compared recursively.
//! Dictionary deltas hold only the changed keys.

use linearize_types::{Dictionary, DictionaryMask, MaskEntry, PathSegment};

use crate::error::DiffResult;
use crate::record_diff::Differ;

impl Differ<'_> {
    pub(crate) fn dictionaries(
        &mut self,
        previous: &Dictionary,
        latest: &Dictionary,
    ) -> DiffResult<(Dictionary, Dictionary, DictionaryMask)> {
        let mut before = Dictionary::new();
        let mut after = Dictionary::new();
        let mut mask = DictionaryMask::new();

        for (key, prev_value) in previous.iter() {
            match latest.get(key) {
                None => {
                    before.insert(key.clone(), prev_value.clone());
                    mask.insert(key.clone(), MaskEntry::remove());
                }
                Some(latest_value) => {
                    self.descend(PathSegment::Key(key.clone()))?;
                    let change = self.compare(prev_value, latest_value)?;
                    self.ascend();
                    if let Some(change) = change {
                        let (b, a, entry) = change.into_entry();
                        before.insert(key.clone(), b);
                        after.insert(key.clone(), a);
                        mask.insert(key.clone(), entry);
                    }
                }
            }
        }

        for (key, latest_value) in latest.iter() {
            if !previous.contains_key(key) {
                after.insert(key.clone(), latest_value.clone());
                mask.insert(key.clone(), MaskEntry::add());
            }
        }

        Ok((before, after, mask))
    }
}
