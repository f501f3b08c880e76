//! Custom serialization for Record to handle the platform JSON format.
//!
//! Records arrive as flat JSON objects. Two members need special handling:
//! - `attributes`: `{"type": "Account", "url": "..."}` carries the object type
//! - nested objects are related records reached through a lookup
//!   (`"Account": {"Name": "Acme", ...}`)
//!
//! Serialization writes the same shape back, so a record survives a trip
//! through the save service unchanged.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Record;

/// Member holding the object type metadata.
pub(crate) const ATTRIBUTES_KEY: &str = "attributes";

#[derive(Serialize)]
struct Attributes<'a> {
    #[serde(rename = "type")]
    object_name: &'a str,
}

// =============================================================================
// Serialization
// =============================================================================

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = self.fields.len() + usize::from(self.object_name.is_some());
        let mut map = serializer.serialize_map(Some(len))?;

        if let Some(object_name) = &self.object_name {
            map.serialize_entry(ATTRIBUTES_KEY, &Attributes { object_name })?;
        }

        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();
        for key in keys {
            map.serialize_entry(key, &self.fields[key])?;
        }

        map.end()
    }
}

// =============================================================================
// Deserialization
// =============================================================================

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a platform record")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut raw = serde_json::Map::new();
        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;
            raw.insert(key, value);
        }
        Ok(Record::from_json_map(raw))
    }
}
