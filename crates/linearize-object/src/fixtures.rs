//! Message types shared by the adapter tests.

use std::collections::HashMap;

use linearize_types::{FieldId, LinearizedValue};

use crate::convert::{
    map, map_value, message, message_value, record_value, repeated_message_value,
    repeated_messages, repeated_scalar_value, repeated_scalars, scalar, scalar_value,
};
use crate::error::AdapterResult;
use crate::schema::{FieldDescriptor, FieldKind, MessageDescriptor, Schema};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Simple {
    pub field1: String,
    pub field2: i32,
    pub repeated: Vec<String>,
}

static SIMPLE: MessageDescriptor = MessageDescriptor {
    name: "Simple",
    fields: &[
        FieldDescriptor::new(1, "field1", FieldKind::Scalar),
        FieldDescriptor::new(2, "field2", FieldKind::Scalar),
        FieldDescriptor::new(3, "repeated", FieldKind::RepeatedScalar),
    ],
};

impl Schema for Simple {
    fn descriptor() -> &'static MessageDescriptor {
        &SIMPLE
    }

    fn get(&self, id: FieldId) -> Option<LinearizedValue> {
        match id.get() {
            1 => scalar_value(&self.field1),
            2 => scalar_value(&self.field2),
            3 => repeated_scalar_value(&self.repeated),
            _ => None,
        }
    }

    fn set(&mut self, id: FieldId, value: &LinearizedValue) -> AdapterResult<()> {
        match id.get() {
            1 => self.field1 = scalar(value)?,
            2 => self.field2 = scalar(value)?,
            3 => self.repeated = repeated_scalars(value)?,
            _ => {}
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Complex {
    pub field1: String,
    pub field2: i32,
    pub nested: Option<Simple>,
    pub repeated: Vec<Simple>,
    pub map: HashMap<String, Simple>,
}

static COMPLEX: MessageDescriptor = MessageDescriptor {
    name: "Complex",
    fields: &[
        FieldDescriptor::new(1, "field1", FieldKind::Scalar),
        FieldDescriptor::new(2, "field2", FieldKind::Scalar),
        FieldDescriptor::new(3, "nested", FieldKind::Message),
        FieldDescriptor::new(4, "repeated", FieldKind::RepeatedMessage),
        FieldDescriptor::new(5, "map", FieldKind::Map),
    ],
};

impl Schema for Complex {
    fn descriptor() -> &'static MessageDescriptor {
        &COMPLEX
    }

    fn get(&self, id: FieldId) -> Option<LinearizedValue> {
        match id.get() {
            1 => scalar_value(&self.field1),
            2 => scalar_value(&self.field2),
            3 => message_value(self.nested.as_ref()),
            4 => repeated_message_value(&self.repeated),
            5 => map_value(&self.map, record_value),
            _ => None,
        }
    }

    fn set(&mut self, id: FieldId, value: &LinearizedValue) -> AdapterResult<()> {
        match id.get() {
            1 => self.field1 = scalar(value)?,
            2 => self.field2 = scalar(value)?,
            3 => self.nested = Some(message(value)?),
            4 => self.repeated = repeated_messages(value)?,
            5 => self.map = map(value, message)?,
            _ => {}
        }
        Ok(())
    }
}
