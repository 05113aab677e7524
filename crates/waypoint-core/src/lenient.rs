//! Tolerant decoding for manifests written by other tools or older versions.
//!
//! A field holding `null` or a value of the wrong type decodes to its default
//! instead of failing the whole document. Map members that can't be typed at
//! all are handed back raw so they can be written out again unchanged.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// `deserialize_with` helper: `null` or mistyped input becomes `T::default()`.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Split raw map members into those that decode as `T` and those that don't.
pub(crate) fn split_typed<T: DeserializeOwned>(
    raw: Map<String, Value>,
) -> (BTreeMap<String, T>, Map<String, Value>) {
    let mut typed = BTreeMap::new();
    let mut rest = Map::new();
    for (key, value) in raw {
        match T::deserialize(&value) {
            Ok(t) => {
                typed.insert(key, t);
            }
            Err(_) => {
                rest.insert(key, value);
            }
        }
    }
    (typed, rest)
}

/// Serializes typed and raw members as one map in key order.
pub(crate) struct Merged<'a, T> {
    pub typed: &'a BTreeMap<String, T>,
    pub raw: &'a Map<String, Value>,
}

impl<T: Serialize> Serialize for Merged<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut keys: Vec<&String> = self.typed.keys().chain(self.raw.keys()).collect();
        keys.sort();
        keys.dedup();

        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            // typed wins if a key somehow appears in both
            if let Some(t) = self.typed.get(key) {
                map.serialize_entry(key, t)?;
            } else if let Some(v) = self.raw.get(key) {
                map.serialize_entry(key, v)?;
            }
        }
        map.end()
    }
}
