//! Scalar-keyed composite node with a deterministic iteration order.
//!
//! Entries are kept sorted by the CRC32 of the key's canonical encoding
//! (see [`Scalar::canonical_bytes`]), with the canonical bytes themselves
//! breaking ties. The order carries no meaning for diffing -- key equality is
//! the identity -- but two independent traversals of the same logical content
//! always visit entries in the same order.

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::scalar::Scalar;
use crate::value::LinearizedValue;

/// A single key/value pair of a [`Dictionary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictEntry {
    pub key: Scalar,
    pub value: LinearizedValue,
}

/// Sort key for a dictionary key: `(crc32, canonical bytes)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct KeyOrder {
    crc: u32,
    bytes: Vec<u8>,
}

impl KeyOrder {
    pub(crate) fn of(key: &Scalar) -> Self {
        let bytes = key.canonical_bytes();
        Self {
            crc: crc32fast::hash(&bytes),
            bytes,
        }
    }
}

/// Key-keyed composite node: a map field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DictEntry>", into = "Vec<DictEntry>")]
pub struct Dictionary {
    entries: Vec<DictEntry>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary, rejecting duplicate keys.
    pub fn try_from_entries<I, K, V>(entries: I) -> TypeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Scalar>,
        V: Into<LinearizedValue>,
    {
        let mut dict = Self::new();
        for (key, value) in entries {
            let key = key.into();
            if dict.contains_key(&key) {
                return Err(TypeError::DuplicateKey(key.to_string()));
            }
            dict.insert(key, value);
        }
        Ok(dict)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<Scalar>, value: impl Into<LinearizedValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an entry, returning the value previously stored under `key`.
    pub fn insert(
        &mut self,
        key: impl Into<Scalar>,
        value: impl Into<LinearizedValue>,
    ) -> Option<LinearizedValue> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Ok(idx) => Some(std::mem::replace(&mut self.entries[idx].value, value)),
            Err(idx) => {
                self.entries.insert(idx, DictEntry { key, value });
                None
            }
        }
    }

    pub fn get(&self, key: &Scalar) -> Option<&LinearizedValue> {
        self.position(key).ok().map(|idx| &self.entries[idx].value)
    }

    pub fn get_mut(&mut self, key: &Scalar) -> Option<&mut LinearizedValue> {
        match self.position(key) {
            Ok(idx) => Some(&mut self.entries[idx].value),
            Err(_) => None,
        }
    }

    pub fn remove(&mut self, key: &Scalar) -> Option<LinearizedValue> {
        self.position(key)
            .ok()
            .map(|idx| self.entries.remove(idx).value)
    }

    pub fn contains_key(&self, key: &Scalar) -> bool {
        self.position(key).is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in dictionary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &LinearizedValue)> {
        self.entries.iter().map(|e| (&e.key, &e.value))
    }

    /// Keys in dictionary order.
    pub fn keys(&self) -> impl Iterator<Item = &Scalar> {
        self.entries.iter().map(|e| &e.key)
    }

    fn position(&self, key: &Scalar) -> Result<usize, usize> {
        let target = KeyOrder::of(key);
        self.entries
            .binary_search_by(|e| KeyOrder::of(&e.key).cmp(&target))
    }
}

impl<K: Into<Scalar>, V: Into<LinearizedValue>> FromIterator<(K, V)> for Dictionary {
    /// Later entries win on duplicate keys.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

impl TryFrom<Vec<DictEntry>> for Dictionary {
    type Error = TypeError;

    fn try_from(entries: Vec<DictEntry>) -> Result<Self, Self::Error> {
        Self::try_from_entries(entries.into_iter().map(|e| (e.key, e.value)))
    }
}

impl From<Dictionary> for Vec<DictEntry> {
    fn from(dict: Dictionary) -> Self {
        dict.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_independent_of_insertion_order() {
        let a = Dictionary::new()
            .with("alpha", 1i64)
            .with("beta", 2i64)
            .with("gamma", 3i64);
        let b = Dictionary::new()
            .with("gamma", 3i64)
            .with("alpha", 1i64)
            .with("beta", 2i64);
        assert_eq!(a, b);
        let ka: Vec<_> = a.keys().cloned().collect();
        let kb: Vec<_> = b.keys().cloned().collect();
        assert_eq!(ka, kb);
    }

    #[test]
    fn order_follows_crc32_of_canonical_key() {
        let dict = Dictionary::new()
            .with("key1", true)
            .with("key2", true)
            .with("key3", true);
        let crcs: Vec<u32> = dict
            .keys()
            .map(|k| crc32fast::hash(&k.canonical_bytes()))
            .collect();
        let mut sorted = crcs.clone();
        sorted.sort_unstable();
        assert_eq!(crcs, sorted);
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut dict = Dictionary::new().with("k", 1i64);
        let old = dict.insert("k", 2i64);
        assert_eq!(old, Some(LinearizedValue::from(1i64)));
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get(&Scalar::from("k")), Some(&LinearizedValue::from(2i64)));
    }

    #[test]
    fn key_identity_is_exact() {
        let dict = Dictionary::new().with(1i64, "int").with(1u64, "uint");
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(&Scalar::Int(1)), Some(&LinearizedValue::from("int")));
        assert_eq!(dict.get(&Scalar::Uint(1)), Some(&LinearizedValue::from("uint")));
    }

    #[test]
    fn remove_and_contains() {
        let mut dict = Dictionary::new().with("a", 1i64).with("b", 2i64);
        assert!(dict.contains_key(&Scalar::from("a")));
        assert_eq!(dict.remove(&Scalar::from("a")), Some(LinearizedValue::from(1i64)));
        assert!(!dict.contains_key(&Scalar::from("a")));
        assert_eq!(dict.remove(&Scalar::from("a")), None);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn try_from_entries_rejects_duplicates() {
        let err = Dictionary::try_from_entries(vec![("a", 1i64), ("a", 2i64)]).unwrap_err();
        assert!(matches!(err, TypeError::DuplicateKey(_)));
    }

    #[test]
    fn serde_roundtrip_restores_order() {
        let dict = Dictionary::new().with("x", 1i64).with("y", 2i64).with("z", 3i64);
        let json = serde_json::to_string(&dict).unwrap();
        let parsed: Dictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(dict, parsed);
    }

    #[test]
    fn deserialize_rejects_duplicate_keys() {
        let json = r#"[
            {"key": {"String": "a"}, "value": {"Scalar": {"Int": 1}}},
            {"key": {"String": "a"}, "value": {"Scalar": {"Int": 2}}}
        ]"#;
        assert!(serde_json::from_str::<Dictionary>(json).is_err());
    }
}
