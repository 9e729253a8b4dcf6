//! The object boundary: linearize and unlinearize.

use tracing::debug;

use linearize_types::{LinearizedValue, Record};

use crate::error::{AdapterError, AdapterResult};
use crate::schema::{FieldDescriptor, MessageDescriptor, Schema};

/// Flatten an object into a record keyed by field identifier.
///
/// An absent object yields the empty record. Unset fields are omitted.
/// Each set field is checked against its declared kind.
pub fn linearize<T: Schema>(object: Option<&T>) -> AdapterResult<Record> {
    let descriptor = T::descriptor();
    let Some(object) = object else {
        debug!(message = descriptor.name, "absent object linearized as empty record");
        return Ok(Record::new());
    };

    let record = record_of(object);
    for (id, value) in &record {
        let field = descriptor.field(*id).ok_or(AdapterError::UnknownField {
            message: descriptor.name,
            id: *id,
        })?;
        check(descriptor, field, value)?;
    }

    debug!(message = descriptor.name, fields = record.len(), "object linearized");
    Ok(record)
}

/// Rebuild an object from a record.
pub fn unlinearize<T: Schema>(tree: &Record) -> AdapterResult<T> {
    let mut target = T::default();
    unlinearize_into(tree, &mut target)?;
    Ok(target)
}

/// Reset `target` to its default, then set every field present in `tree`.
pub fn unlinearize_into<T: Schema>(tree: &Record, target: &mut T) -> AdapterResult<()> {
    let descriptor = T::descriptor();
    *target = T::default();

    for (id, value) in tree {
        let field = descriptor.field(*id).ok_or(AdapterError::UnknownField {
            message: descriptor.name,
            id: *id,
        })?;
        check(descriptor, field, value)?;
        target.set(*id, value)?;
    }

    debug!(message = descriptor.name, fields = tree.len(), "object unlinearized");
    Ok(())
}

/// Collect every set field of `object` without validation.
pub(crate) fn record_of<T: Schema>(object: &T) -> Record {
    T::descriptor()
        .fields
        .iter()
        .filter_map(|field| object.get(field.id).map(|value| (field.id, value)))
        .collect()
}

fn check(
    descriptor: &MessageDescriptor,
    field: &FieldDescriptor,
    value: &LinearizedValue,
) -> AdapterResult<()> {
    field
        .kind
        .check(value)
        .map_err(|found| AdapterError::ShapeMismatch {
            message: descriptor.name,
            field: field.name,
            expected: field.kind,
            found,
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use linearize_types::{Dictionary, FieldId, Sequence, ValueKind};

    use super::*;
    use crate::fixtures::{Complex, Simple};
    use crate::schema::FieldKind;

    fn simple(field1: &str, field2: i32, repeated: &[&str]) -> Simple {
        Simple {
            field1: field1.into(),
            field2,
            repeated: repeated.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn absent_object_is_empty_record() {
        assert_eq!(linearize::<Simple>(None).unwrap(), Record::new());
    }

    #[test]
    fn simple_object_linearizes_by_field_id() {
        let record = linearize(Some(&simple("test1", 42, &["value1", "value2"]))).unwrap();
        let repeated: Sequence = ["value1", "value2"].into_iter().collect();
        assert_eq!(
            record,
            Record::new()
                .with(1u32, "test1")
                .with(2u32, 42i64)
                .with(3u32, repeated)
        );
    }

    #[test]
    fn unset_fields_are_omitted() {
        let record = linearize(Some(&simple("", 7, &[]))).unwrap();
        assert_eq!(record, Record::new().with(2u32, 7i64));
    }

    #[test]
    fn complex_object_round_trips() {
        let mut map = HashMap::new();
        map.insert("key1".to_string(), simple("m1", 1, &[]));
        map.insert("key2".to_string(), simple("m2", 2, &["x"]));

        let object = Complex {
            field1: "root".into(),
            field2: -5,
            nested: Some(simple("inner", 3, &["a"])),
            repeated: vec![simple("r0", 0, &[]), Simple::default()],
            map,
        };

        let record = linearize(Some(&object)).unwrap();
        let nested = record.get(FieldId::new(3)).unwrap().as_record().unwrap();
        assert_eq!(nested.get(FieldId::new(1)), Some(&"inner".into()));
        let dict: &Dictionary = record.get(FieldId::new(5)).unwrap().as_dictionary().unwrap();
        assert_eq!(dict.len(), 2);

        let back: Complex = unlinearize(&record).unwrap();
        assert_eq!(back, object);
    }

    #[test]
    fn unlinearize_into_resets_target() {
        let mut target = simple("stale", 9, &["old"]);
        unlinearize_into(&Record::new().with(1u32, "fresh"), &mut target).unwrap();
        assert_eq!(target, simple("fresh", 0, &[]));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = unlinearize::<Simple>(&Record::new().with(42u32, "x")).unwrap_err();
        assert_eq!(
            err,
            AdapterError::UnknownField {
                message: "Simple",
                id: FieldId::new(42)
            }
        );
        assert_eq!(err.to_string(), "unknown field 42 for message Simple");
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let err = unlinearize::<Complex>(&Record::new().with(3u32, "not a message")).unwrap_err();
        assert_eq!(
            err,
            AdapterError::ShapeMismatch {
                message: "Complex",
                field: "nested",
                expected: FieldKind::Message,
                found: ValueKind::Scalar,
            }
        );
    }

    #[test]
    fn nested_errors_propagate() {
        let record = Record::new().with(3u32, Record::new().with(2u32, "not an int"));
        let err = unlinearize::<Complex>(&record).unwrap_err();
        assert!(matches!(err, AdapterError::ScalarMismatch { expected: "int", found: "string" }));
    }
}
