//! Record-level merge and the nested-mask dispatch shared by every container.
//!
//! For each masked field identifier:
//!
//! - `REMOVE` -- delete the field (a no-op if it is already absent)
//! - `ADD` / `UPDATE` without nested mask -- overwrite with the delta value
//! - `UPDATE` with nested mask -- recurse into the current composite value

use tracing::{debug, trace};

use linearize_types::{
    LinearizedValue, MaskEntry, MaskOp, NestedMask, PathSegment, Record, UpdateMask, ValueKind,
    ValuePath,
};

use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};

/// Apply `mask` to a copy of `current`, reading new values from `diff`.
///
/// `current` is never modified, so it keeps its original value when the
/// merge fails.
pub fn merge(mask: &UpdateMask, current: &Record, diff: &Record) -> MergeResult<Record> {
    merge_with(&MergeConfig::default(), mask, current, diff)
}

pub fn merge_with(
    config: &MergeConfig,
    mask: &UpdateMask,
    current: &Record,
    diff: &Record,
) -> MergeResult<Record> {
    let mut result = current.clone();
    merge_in_place_with(config, mask, &mut result, diff)?;
    Ok(result)
}

/// Apply `mask` to `current` in place.
///
/// On error `current` may be partially updated; callers must discard it.
pub fn merge_in_place(mask: &UpdateMask, current: &mut Record, diff: &Record) -> MergeResult<()> {
    merge_in_place_with(&MergeConfig::default(), mask, current, diff)
}

pub fn merge_in_place_with(
    config: &MergeConfig,
    mask: &UpdateMask,
    current: &mut Record,
    diff: &Record,
) -> MergeResult<()> {
    let mut merger = Merger::new(config);
    merger.record(mask, current, diff)?;

    let summary = mask.summary();
    debug!(
        fields = mask.len(),
        additions = summary.additions,
        removals = summary.removals,
        updates = summary.updates,
        "mask applied"
    );
    Ok(())
}

/// Recursive walker over a mask tree.
pub(crate) struct Merger<'c> {
    config: &'c MergeConfig,
    pub(crate) path: ValuePath,
}

impl<'c> Merger<'c> {
    pub(crate) fn new(config: &'c MergeConfig) -> Self {
        Self {
            config,
            path: ValuePath::root(),
        }
    }

    pub(crate) fn descend(&mut self, segment: PathSegment) -> MergeResult<()> {
        self.path.push(segment);
        if self.path.depth() > self.config.max_depth {
            return Err(MergeError::DepthLimitExceeded {
                path: self.path.clone(),
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.path.pop();
    }

    pub(crate) fn conflict(&self, reason: impl Into<String>) -> MergeError {
        MergeError::ConflictingOperations {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_delta(&self) -> MergeError {
        MergeError::MissingDelta {
            path: self.path.clone(),
        }
    }

    /// Reject entries whose op cannot carry a nested mask.
    pub(crate) fn check_entry(&self, entry: &MaskEntry) -> MergeResult<()> {
        if entry.nested.is_some() && entry.op != MaskOp::Update {
            return Err(self.conflict(format!("{} carries a nested mask", entry.op)));
        }
        Ok(())
    }

    pub(crate) fn record(
        &mut self,
        mask: &UpdateMask,
        current: &mut Record,
        diff: &Record,
    ) -> MergeResult<()> {
        for (id, entry) in mask {
            self.descend(PathSegment::Field(*id))?;
            self.check_entry(entry)?;
            trace!(path = %self.path, op = %entry.op, "applying record entry");

            match (entry.op, &entry.nested) {
                (MaskOp::Remove, _) => {
                    current.remove(*id);
                }
                (_, None) => {
                    let value = diff.get(*id).ok_or_else(|| self.missing_delta())?;
                    current.insert(*id, value.clone());
                }
                (_, Some(nested)) => {
                    let delta = diff.get(*id).ok_or_else(|| self.missing_delta())?;
                    let slot = current.get_mut(*id).ok_or_else(|| MergeError::MissingTarget {
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

    /// Recurse into a composite slot, dispatching on the mask's expected kind.
    pub(crate) fn nested(
        &mut self,
        mask: &NestedMask,
        current: &mut LinearizedValue,
        diff: &LinearizedValue,
    ) -> MergeResult<()> {
        use LinearizedValue as V;

        match (mask, current) {
            (NestedMask::Record(m), V::Record(c)) => {
                let d = self.delta_as(diff, ValueKind::Record, V::as_record)?;
                self.record(m, c, d)
            }
            (NestedMask::Sequence(m), V::Sequence(c)) => {
                let d = self.delta_as(diff, ValueKind::Sequence, V::as_sequence)?;
                self.sequence(m, c, d)
            }
            (NestedMask::Dictionary(m), V::Dictionary(c)) => {
                let d = self.delta_as(diff, ValueKind::Dictionary, V::as_dictionary)?;
                self.dictionary(m, c, d)
            }
            (m, other) => Err(MergeError::ShapeMismatch {
                path: self.path.clone(),
                expected: m.expected_kind(),
                found: other.kind(),
            }),
        }
    }

    fn delta_as<'d, T>(
        &self,
        diff: &'d LinearizedValue,
        expected: ValueKind,
        extract: impl FnOnce(&'d LinearizedValue) -> linearize_types::TypeResult<&'d T>,
    ) -> MergeResult<&'d T> {
        extract(diff).map_err(|_| MergeError::DeltaShapeMismatch {
            path: self.path.clone(),
            expected,
            found: diff.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use linearize_diff::diff;
    use linearize_types::{
        Dictionary, DictionaryMask, FieldId, Scalar, Sequence, SequenceMask,
    };
    use proptest::prelude::*;

    use super::*;

    fn seq(items: &[&str]) -> Sequence {
        items.iter().copied().collect()
    }

    fn round_trip(previous: &Record, latest: &Record) -> Record {
        let d = diff(previous, latest).unwrap();
        match d.mask {
            Some(mask) => merge(&mask, previous, &d.after).unwrap(),
            None => previous.clone(),
        }
    }

    #[test]
    fn scalar_update_applies() {
        let current = Record::new().with(1u32, "a").with(2u32, 10i64);
        let mask = UpdateMask::new().with(1u32, MaskEntry::update());
        let delta = Record::new().with(1u32, "b");

        let merged = merge(&mask, &current, &delta).unwrap();
        assert_eq!(merged, Record::new().with(1u32, "b").with(2u32, 10i64));
    }

    #[test]
    fn unmasked_fields_are_untouched() {
        let current = Record::new().with(1u32, "a").with(2u32, 10i64);
        let mask = UpdateMask::new().with(1u32, MaskEntry::update());
        // Field 2 in the delta is ignored because it is not masked.
        let delta = Record::new().with(1u32, "b").with(2u32, 99i64);

        let merged = merge(&mask, &current, &delta).unwrap();
        assert_eq!(merged.get(FieldId::new(2)), Some(&10i64.into()));
    }

    #[test]
    fn remove_of_absent_field_is_noop() {
        let current = Record::new().with(2u32, 5i64);
        let mask = UpdateMask::new().with(1u32, MaskEntry::remove());
        let merged = merge(&mask, &current, &Record::new()).unwrap();
        assert_eq!(merged, current);
    }

    #[test]
    fn documented_scenarios_round_trip() {
        let cases = vec![
            (
                Record::new().with(1u32, "a").with(2u32, 10i64),
                Record::new().with(1u32, "b").with(2u32, 10i64),
            ),
            (
                Record::new().with(1u32, "x").with(3u32, seq(&["p", "q"])),
                Record::new().with(1u32, "x").with(3u32, seq(&["p", "q", "r"])),
            ),
            (
                Record::new().with(5u32, Dictionary::new().with("k1", Record::new().with(1u32, "v1"))),
                Record::new().with(5u32, Dictionary::new().with("k1", Record::new().with(1u32, "v2"))),
            ),
            (
                Record::new().with(1u32, "a").with(2u32, 5i64),
                Record::new().with(2u32, 5i64),
            ),
            (Record::new(), Record::new()),
        ];
        for (previous, latest) in cases {
            assert_eq!(round_trip(&previous, &latest), latest);
        }
    }

    #[test]
    fn growing_and_shrinking_sequences_round_trip() {
        let base = Record::new().with(1u32, "test1").with(2u32, 42i64).with(3u32, seq(&["value1", "value2"]));

        let grown = Record::new().with(2u32, 200i64).with(
            3u32,
            seq(&["value1", "value2", "item3", "item4"]),
        );
        assert_eq!(round_trip(&base, &grown), grown);

        let shrunk = Record::new()
            .with(1u32, "changed_field1")
            .with(2u32, 200i64)
            .with(3u32, seq(&["item3"]));
        assert_eq!(round_trip(&base, &shrunk), shrunk);
    }

    #[test]
    fn nested_mask_on_scalar_is_shape_mismatch() {
        let current = Record::new().with(4u32, "not a record");
        let mask = UpdateMask::new().with(
            4u32,
            MaskEntry::update_nested(UpdateMask::new().with(1u32, MaskEntry::update())),
        );
        let delta = Record::new().with(4u32, Record::new().with(1u32, "v"));

        let err = merge(&mask, &current, &delta).unwrap_err();
        assert_eq!(
            err,
            MergeError::ShapeMismatch {
                path: ValuePath::root().child(PathSegment::Field(FieldId::new(4))),
                expected: ValueKind::Record,
                found: ValueKind::Scalar,
            }
        );
    }

    #[test]
    fn nested_mask_on_wrong_composite_is_shape_mismatch() {
        let current = Record::new().with(4u32, Dictionary::new());
        let mask = UpdateMask::new().with(
            4u32,
            MaskEntry::update_nested(SequenceMask::new().with(0, MaskEntry::add())),
        );
        let delta = Record::new().with(4u32, seq(&["a"]));
        assert!(matches!(
            merge(&mask, &current, &delta),
            Err(MergeError::ShapeMismatch {
                expected: ValueKind::Sequence,
                found: ValueKind::Dictionary,
                ..
            })
        ));
    }

    #[test]
    fn nested_mask_on_absent_slot_is_missing_target() {
        let mask = UpdateMask::new().with(
            4u32,
            MaskEntry::update_nested(DictionaryMask::new().with("k", MaskEntry::add())),
        );
        let delta = Record::new().with(4u32, Dictionary::new().with("k", 1i64));
        assert!(matches!(
            merge(&mask, &Record::new(), &delta),
            Err(MergeError::MissingTarget {
                expected: ValueKind::Dictionary,
                ..
            })
        ));
    }

    #[test]
    fn masked_slot_without_delta_is_error() {
        let mask = UpdateMask::new().with(9u32, MaskEntry::add());
        let err = merge(&mask, &Record::new(), &Record::new()).unwrap_err();
        assert_eq!(err.to_string(), "missing delta value at .9");
    }

    #[test]
    fn delta_of_wrong_kind_is_error() {
        let current = Record::new().with(1u32, Record::new().with(1u32, "a"));
        let mask = UpdateMask::new().with(
            1u32,
            MaskEntry::update_nested(UpdateMask::new().with(1u32, MaskEntry::update())),
        );
        let delta = Record::new().with(1u32, "oops");
        assert!(matches!(
            merge(&mask, &current, &delta),
            Err(MergeError::DeltaShapeMismatch { .. })
        ));
    }

    #[test]
    fn remove_with_nested_mask_is_conflict() {
        let current = Record::new().with(1u32, Record::new());
        let mask = UpdateMask::new().with(
            1u32,
            MaskEntry {
                op: MaskOp::Remove,
                nested: Some(NestedMask::Record(UpdateMask::new())),
            },
        );
        assert!(matches!(
            merge(&mask, &current, &Record::new()),
            Err(MergeError::ConflictingOperations { .. })
        ));
    }

    #[test]
    fn copy_variant_preserves_current_on_failure() {
        let current = Record::new().with(1u32, "a").with(2u32, "b");
        let mask = UpdateMask::new()
            .with(1u32, MaskEntry::remove())
            .with(2u32, MaskEntry::update_nested(UpdateMask::new()));
        let before = current.clone();
        assert!(merge(&mask, &current, &Record::new().with(2u32, Record::new())).is_err());
        assert_eq!(current, before);
    }

    #[test]
    fn in_place_matches_copy() {
        let previous = Record::new()
            .with(1u32, "x")
            .with(3u32, seq(&["p", "q", "r"]))
            .with(5u32, Dictionary::new().with("a", 1i64).with("b", 2i64));
        let latest = Record::new()
            .with(1u32, "y")
            .with(3u32, seq(&["p"]))
            .with(5u32, Dictionary::new().with("b", 3i64).with("c", 4i64));
        let d = diff(&previous, &latest).unwrap();
        let mask = d.mask.unwrap();

        let copied = merge(&mask, &previous, &d.after).unwrap();
        let mut in_place = previous.clone();
        merge_in_place(&mask, &mut in_place, &d.after).unwrap();
        assert_eq!(copied, in_place);
        assert_eq!(in_place, latest);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut mask = UpdateMask::new().with(1u32, MaskEntry::update());
        let mut current = Record::new().with(1u32, "a");
        let mut delta = Record::new().with(1u32, "b");
        for _ in 0..3 {
            mask = UpdateMask::new().with(1u32, MaskEntry::update_nested(mask));
            current = Record::new().with(1u32, current);
            delta = Record::new().with(1u32, delta);
        }
        let config = MergeConfig { max_depth: 2 };
        assert!(matches!(
            merge_with(&config, &mask, &current, &delta),
            Err(MergeError::DepthLimitExceeded { limit: 2, .. })
        ));
        let merged = merge(&mask, &current, &delta).unwrap();
        assert_eq!(merged, delta);
    }

    // ---------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------

    fn arb_scalar() -> impl Strategy<Value = Scalar> {
        prop_oneof![
            any::<bool>().prop_map(Scalar::Bool),
            (-3i64..3).prop_map(Scalar::Int),
            "[a-c]{0,2}".prop_map(Scalar::String),
        ]
    }

    fn arb_value() -> impl Strategy<Value = LinearizedValue> {
        let leaf = arb_scalar().prop_map(LinearizedValue::Scalar);
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::btree_map(0u32..4, inner.clone(), 0..4).prop_map(|m| {
                    LinearizedValue::Record(m.into_iter().map(|(k, v)| (FieldId::new(k), v)).collect())
                }),
                prop::collection::vec(inner.clone(), 0..4)
                    .prop_map(|v| LinearizedValue::Sequence(v.into())),
                prop::collection::vec(("[a-c]", inner), 0..4)
                    .prop_map(|kv| LinearizedValue::Dictionary(kv.into_iter().collect())),
            ]
        })
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        prop::collection::btree_map(0u32..5, arb_value(), 0..5)
            .prop_map(|m| m.into_iter().map(|(k, v)| (FieldId::new(k), v)).collect())
    }

    proptest! {
        #[test]
        fn merging_forward_delta_into_previous_yields_latest(a in arb_record(), b in arb_record()) {
            let d = diff(&a, &b).unwrap();
            let merged = match &d.mask {
                Some(mask) => merge(mask, &a, &d.after).unwrap(),
                None => a.clone(),
            };
            prop_assert_eq!(merged, b);
        }

        #[test]
        fn merging_into_before_delta_reproduces_changed_region(a in arb_record(), b in arb_record()) {
            let d = diff(&a, &b).unwrap();
            if let Some(mask) = &d.mask {
                let merged = merge(mask, &d.before, &d.after).unwrap();
                prop_assert_eq!(&merged, &d.after);
                for (id, entry) in mask {
                    if entry.nested.is_none() {
                        prop_assert_eq!(merged.get(*id), b.get(*id));
                    }
                }
            }
        }

        #[test]
        fn merge_is_idempotent(a in arb_record(), b in arb_record()) {
            let d = diff(&a, &b).unwrap();
            if let Some(mask) = &d.mask {
                let once = merge(mask, &a, &d.after).unwrap();
                let twice = merge(mask, &once, &d.after).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        #[test]
        fn identical_snapshots_have_no_mask(a in arb_record()) {
            prop_assert!(diff(&a, &a).unwrap().mask.is_none());
        }
    }
}
