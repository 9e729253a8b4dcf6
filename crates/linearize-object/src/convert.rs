//! Conversions used by [`Schema`] implementations.
//!
//! The `*_value` helpers build linearized values from struct fields and
//! return `None` for unset fields (default scalars, empty lists and maps).
//! The remaining helpers read struct fields back out of linearized values.
//! Scalar conversions are exact: no variant is coerced into another.

use std::collections::HashMap;
use std::hash::Hash;

use linearize_types::{Dictionary, LinearizedValue, Scalar, Sequence};

use crate::adapter::{record_of, unlinearize};
use crate::error::{AdapterError, AdapterResult};
use crate::schema::Schema;

/// Borrowing conversion to a [`Scalar`].
pub trait IntoScalar {
    fn to_scalar(&self) -> Scalar;
}

/// Exact conversion out of a [`Scalar`].
pub trait FromScalar: Sized {
    fn from_scalar(scalar: &Scalar) -> AdapterResult<Self>;
}

fn mismatch(expected: &'static str, found: &Scalar) -> AdapterError {
    AdapterError::ScalarMismatch {
        expected,
        found: found.type_name(),
    }
}

macro_rules! scalar_conversions {
    ($($t:ty => $variant:ident, $name:literal);* $(;)?) => {
        $(
            impl IntoScalar for $t {
                fn to_scalar(&self) -> Scalar {
                    Scalar::from(self.clone())
                }
            }

            impl FromScalar for $t {
                fn from_scalar(scalar: &Scalar) -> AdapterResult<Self> {
                    match scalar {
                        Scalar::$variant(v) => Ok(v.clone()),
                        other => Err(mismatch($name, other)),
                    }
                }
            }
        )*
    };
}

scalar_conversions! {
    bool => Bool, "bool";
    i64 => Int, "int";
    u64 => Uint, "uint";
    f64 => Float, "float";
    String => String, "string";
    Vec<u8> => Bytes, "bytes";
}

impl IntoScalar for i32 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Int(i64::from(*self))
    }
}

impl FromScalar for i32 {
    fn from_scalar(scalar: &Scalar) -> AdapterResult<Self> {
        let v = i64::from_scalar(scalar)?;
        i32::try_from(v).map_err(|_| AdapterError::OutOfRange {
            value: v.to_string(),
            target: "i32",
        })
    }
}

impl IntoScalar for u32 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Uint(u64::from(*self))
    }
}

impl FromScalar for u32 {
    fn from_scalar(scalar: &Scalar) -> AdapterResult<Self> {
        let v = u64::from_scalar(scalar)?;
        u32::try_from(v).map_err(|_| AdapterError::OutOfRange {
            value: v.to_string(),
            target: "u32",
        })
    }
}

impl IntoScalar for f32 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Float(f64::from(*self))
    }
}

impl FromScalar for f32 {
    fn from_scalar(scalar: &Scalar) -> AdapterResult<Self> {
        // Only values an f32 can hold exactly; NaN and infinities pass.
        let v = f64::from_scalar(scalar)?;
        let narrowed = v as f32;
        if v.is_nan() || f64::from(narrowed) == v {
            Ok(narrowed)
        } else {
            Err(AdapterError::OutOfRange {
                value: v.to_string(),
                target: "f32",
            })
        }
    }
}

impl IntoScalar for &str {
    fn to_scalar(&self) -> Scalar {
        Scalar::String((*self).to_owned())
    }
}

// ---------------------------------------------------------------------------
// Struct field -> linearized value
// ---------------------------------------------------------------------------

/// A scalar field, or `None` when it holds its default.
pub fn scalar_value<T: IntoScalar + Default + PartialEq>(value: &T) -> Option<LinearizedValue> {
    (*value != T::default()).then(|| value.to_scalar().into())
}

/// An enum field stored by its number, or `None` when it is zero.
pub fn enum_value(number: i32) -> Option<LinearizedValue> {
    (number != 0).then(|| Scalar::Enum(number).into())
}

/// A nested message field, or `None` when it is unset.
///
/// A set message with no fields of its own still yields an empty record.
pub fn message_value<M: Schema>(message: Option<&M>) -> Option<LinearizedValue> {
    message.map(record_value)
}

/// A message that is always present, such as a list element or map value.
pub fn record_value<M: Schema>(message: &M) -> LinearizedValue {
    record_of(message).into()
}

pub fn repeated_scalar_value<T: IntoScalar>(items: &[T]) -> Option<LinearizedValue> {
    if items.is_empty() {
        return None;
    }
    let seq: Sequence = items.iter().map(IntoScalar::to_scalar).collect();
    Some(seq.into())
}

pub fn repeated_message_value<M: Schema>(items: &[M]) -> Option<LinearizedValue> {
    if items.is_empty() {
        return None;
    }
    let seq: Sequence = items.iter().map(record_value).collect();
    Some(seq.into())
}

/// A map field whose values are converted by `value`.
pub fn map_value<K, V, F>(map: &HashMap<K, V>, value: F) -> Option<LinearizedValue>
where
    K: IntoScalar,
    F: Fn(&V) -> LinearizedValue,
{
    if map.is_empty() {
        return None;
    }
    let dict: Dictionary = map.iter().map(|(k, v)| (k.to_scalar(), value(v))).collect();
    Some(dict.into())
}

// ---------------------------------------------------------------------------
// Linearized value -> struct field
// ---------------------------------------------------------------------------

pub fn scalar<T: FromScalar>(value: &LinearizedValue) -> AdapterResult<T> {
    T::from_scalar(value.as_scalar()?)
}

pub fn enum_number(value: &LinearizedValue) -> AdapterResult<i32> {
    let scalar = value.as_scalar()?;
    scalar.as_enum().ok_or_else(|| mismatch("enum", scalar))
}

pub fn message<M: Schema>(value: &LinearizedValue) -> AdapterResult<M> {
    unlinearize(value.as_record()?)
}

pub fn repeated_scalars<T: FromScalar>(value: &LinearizedValue) -> AdapterResult<Vec<T>> {
    value.as_sequence()?.iter().map(scalar::<T>).collect()
}

pub fn repeated_messages<M: Schema>(value: &LinearizedValue) -> AdapterResult<Vec<M>> {
    value.as_sequence()?.iter().map(message::<M>).collect()
}

/// A map field whose values are converted by `value`.
pub fn map<K, V, F>(value: &LinearizedValue, convert: F) -> AdapterResult<HashMap<K, V>>
where
    K: FromScalar + Eq + Hash,
    F: Fn(&LinearizedValue) -> AdapterResult<V>,
{
    value
        .as_dictionary()?
        .iter()
        .map(|(k, v)| Ok((K::from_scalar(k)?, convert(v)?)))
        .collect()
}
