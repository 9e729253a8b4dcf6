//! Map deserialization that rejects repeated keys.
//!
//! Identifier-keyed nodes serialize as plain maps. A text document can still
//! repeat a key, which a `BTreeMap` would silently collapse to the last value.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::TypeError;

pub(crate) fn deserialize<'de, D, K, V>(
    deserializer: D,
    duplicate: fn(K) -> TypeError,
) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    deserializer.deserialize_map(UniqueMap {
        duplicate,
        marker: PhantomData,
    })
}

struct UniqueMap<K, V> {
    duplicate: fn(K) -> TypeError,
    marker: PhantomData<fn() -> (K, V)>,
}

impl<'de, K, V> Visitor<'de> for UniqueMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = BTreeMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with unique keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<K, V>()? {
            if map.contains_key(&key) {
                return Err(de::Error::custom((self.duplicate)(key)));
            }
            map.insert(key, value);
        }
        Ok(map)
    }
}
