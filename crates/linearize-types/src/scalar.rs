use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque leaf value.
///
/// Scalars are compared by exact value equality: there is no coercion
/// between variants, so `Int(1)` and `Uint(1)` are different values.
#[derive(Clone, Serialize, Deserialize)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Uint(u64),
    /// Non-finite values serialize as the strings `"NaN"`, `"inf"` and
    /// `"-inf"` so that text formats without them can carry every float.
    Float(#[serde(with = "float_repr")] f64),
    String(String),
    Bytes(Vec<u8>),
    /// Enum-like primitive, stored by its numeric value.
    Enum(i32),
}

// Kind tags for the canonical key encoding.
const TAG_BOOL: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_UINT: u8 = 0x03;
const TAG_FLOAT: u8 = 0x04;
const TAG_STRING: u8 = 0x05;
const TAG_BYTES: u8 = 0x06;
const TAG_ENUM: u8 = 0x07;

impl Scalar {
    /// Short name of the scalar variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Uint(_) => "uint",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
            Scalar::Bytes(_) => "bytes",
            Scalar::Enum(_) => "enum",
        }
    }

    /// Canonical byte encoding: one kind tag followed by the value bytes.
    ///
    /// Two scalars are equal iff their canonical encodings are equal, so the
    /// encoding can be used as a total order and as hash input. `-0.0` is
    /// folded into `0.0` and every NaN into a single quiet NaN to keep that
    /// property for floats.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(9);
        match self {
            Scalar::Bool(v) => {
                out.push(TAG_BOOL);
                out.push(u8::from(*v));
            }
            Scalar::Int(v) => {
                out.push(TAG_INT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            Scalar::Uint(v) => {
                out.push(TAG_UINT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            Scalar::Float(v) => {
                out.push(TAG_FLOAT);
                let normalized = if v.is_nan() {
                    f64::NAN
                } else if *v == 0.0 {
                    0.0
                } else {
                    *v
                };
                out.extend_from_slice(&normalized.to_bits().to_be_bytes());
            }
            Scalar::String(v) => {
                out.push(TAG_STRING);
                out.extend_from_slice(v.as_bytes());
            }
            Scalar::Bytes(v) => {
                out.push(TAG_BYTES);
                out.extend_from_slice(v);
            }
            Scalar::Enum(v) => {
                out.push(TAG_ENUM);
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
        out
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Scalar::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Scalar::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i32> {
        match self {
            Scalar::Enum(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Uint(a), Scalar::Uint(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Bytes(a), Scalar::Bytes(b)) => a == b,
            (Scalar::Enum(a), Scalar::Enum(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => fmt::Debug::fmt(v, f),
            Scalar::Int(v) => fmt::Debug::fmt(v, f),
            Scalar::Uint(v) => write!(f, "{v}u"),
            Scalar::Float(v) => fmt::Debug::fmt(v, f),
            Scalar::String(v) => fmt::Debug::fmt(v, f),
            Scalar::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            Scalar::Enum(v) => write!(f, "enum({v})"),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug already renders strings quoted and bytes as hex.
        fmt::Debug::fmt(self, f)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(i64::from(v))
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Uint(u64::from(v))
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::Uint(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(f64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(v: Vec<u8>) -> Self {
        Scalar::Bytes(v)
    }
}

mod float_repr {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INF: &str = "inf";
    const NEG_INF: &str = "-inf";

    pub(super) fn serialize<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            serializer.serialize_f64(*v)
        } else if v.is_nan() {
            serializer.serialize_str(NAN)
        } else if v.is_sign_positive() {
            serializer.serialize_str(INF)
        } else {
            serializer.serialize_str(NEG_INF)
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }

    struct FloatVisitor;

    impl Visitor<'_> for FloatVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or one of \"NaN\", \"inf\", \"-inf\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                NAN => Ok(f64::NAN),
                INF => Ok(f64::INFINITY),
                NEG_INF => Ok(f64::NEG_INFINITY),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }
}
