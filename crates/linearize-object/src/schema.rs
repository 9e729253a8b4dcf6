use std::fmt;

use serde::{Deserialize, Serialize};

use linearize_types::{FieldId, LinearizedValue, ValueKind};

use crate::error::AdapterResult;

/// The declared shape of a message field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A single scalar.
    Scalar,
    /// A nested message, linearized as a record.
    Message,
    /// A list of scalars.
    RepeatedScalar,
    /// A list of nested messages.
    RepeatedMessage,
    /// A scalar-keyed map.
    Map,
}

impl FieldKind {
    /// The tree kind a value of this field linearizes to.
    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::Scalar => ValueKind::Scalar,
            Self::Message => ValueKind::Record,
            Self::RepeatedScalar | Self::RepeatedMessage => ValueKind::Sequence,
            Self::Map => ValueKind::Dictionary,
        }
    }

    /// Check `value` against this kind, returning the offending kind on
    /// mismatch. Repeated kinds also check every element.
    pub(crate) fn check(self, value: &LinearizedValue) -> Result<(), ValueKind> {
        if value.kind() != self.value_kind() {
            return Err(value.kind());
        }
        let element = match self {
            Self::RepeatedScalar => ValueKind::Scalar,
            Self::RepeatedMessage => ValueKind::Record,
            _ => return Ok(()),
        };
        match value
            .as_sequence()
            .ok()
            .and_then(|items| items.iter().find(|item| item.kind() != element))
        {
            Some(bad) => Err(bad.kind()),
            None => Ok(()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Message => write!(f, "message"),
            Self::RepeatedScalar => write!(f, "repeated scalar"),
            Self::RepeatedMessage => write!(f, "repeated message"),
            Self::Map => write!(f, "map"),
        }
    }
}

/// One declared field of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(id: u32, name: &'static str, kind: FieldKind) -> Self {
        Self {
            id: FieldId::new(id),
            name,
            kind,
        }
    }
}

/// Static description of a message type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    /// Look up a field by identifier.
    pub fn field(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Look up a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// A struct that can cross the object boundary.
///
/// Implementations must agree with their descriptor:
/// - `get` returns `None` for an unset field and a value of the declared
///   kind otherwise.
/// - `set` is only called with identifiers the descriptor declares and
///   values already checked against the declared kind.
/// - `Default` is the object with every field unset.
pub trait Schema: Default {
    /// The static descriptor for this message type.
    fn descriptor() -> &'static MessageDescriptor;

    /// Read one field as a linearized value.
    fn get(&self, id: FieldId) -> Option<LinearizedValue>;

    /// Write one field from a linearized value.
    fn set(&mut self, id: FieldId, value: &LinearizedValue) -> AdapterResult<()>;
}

#[cfg(test)]
mod tests {
    use linearize_types::{Record, Sequence};

    use super::*;
    use crate::fixtures::Complex;

    #[test]
    fn descriptor_lookup() {
        let d = Complex::descriptor();
        assert_eq!(d.field(FieldId::new(3)).unwrap().name, "nested");
        assert_eq!(d.field_by_name("map").unwrap().kind, FieldKind::Map);
        assert!(d.field(FieldId::new(99)).is_none());
    }

    #[test]
    fn repeated_kind_checks_elements() {
        let ok: Sequence = ["a", "b"].into_iter().collect();
        assert_eq!(FieldKind::RepeatedScalar.check(&ok.into()), Ok(()));

        let mixed: Sequence = vec![LinearizedValue::from("a"), Record::new().into()].into();
        assert_eq!(
            FieldKind::RepeatedScalar.check(&mixed.into()),
            Err(ValueKind::Record)
        );
    }

    #[test]
    fn message_kind_requires_record() {
        assert_eq!(
            FieldKind::Message.check(&LinearizedValue::from(1i64)),
            Err(ValueKind::Scalar)
        );
        assert_eq!(FieldKind::Map.value_kind(), ValueKind::Dictionary);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&FieldKind::RepeatedMessage).unwrap();
        assert_eq!(json, "\"repeated_message\"");
    }
}
