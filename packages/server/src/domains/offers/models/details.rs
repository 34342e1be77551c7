//! Detail attributes attached to an offer.
//!
//! An offer carries an ordered sequence of single-key records, one per
//! attribute. On the wire each record is a one-entry JSON map
//! (`{"brand": "Nike"}`), matching the stored document shape. Updates may
//! overwrite a record's value but never add or remove a slot.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The attribute names an offer can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKey {
    Brand,
    Size,
    Condition,
    Color,
    Location,
}

impl DetailKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailKey::Brand => "brand",
            DetailKey::Size => "size",
            DetailKey::Condition => "condition",
            DetailKey::Color => "color",
            DetailKey::Location => "location",
        }
    }
}

impl fmt::Display for DetailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled attribute of an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub key: DetailKey,
    pub value: String,
}

impl DetailRecord {
    pub fn new(key: DetailKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

impl Serialize for DetailRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for DetailRecord {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = DetailRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a single-key detail map such as {\"brand\": \"...\"}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let Some((key, value)) = map.next_entry::<DetailKey, String>()? else {
                    return Err(de::Error::invalid_length(0, &self));
                };
                if map.next_key::<DetailKey>()?.is_some() {
                    return Err(de::Error::custom(
                        "detail record must contain exactly one attribute",
                    ));
                }
                Ok(DetailRecord { key, value })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Overwrite the value of each record whose key appears in `updates`.
///
/// Slot order is untouched. An update for an attribute the sequence does
/// not carry is an error, returned as the offending key.
pub fn apply_detail_updates(
    details: &mut [DetailRecord],
    updates: &[(DetailKey, String)],
) -> Result<(), DetailKey> {
    for (key, value) in updates {
        match details.iter_mut().find(|record| record.key == *key) {
            Some(record) => record.value = value.clone(),
            None => return Err(*key),
        }
    }
    Ok(())
}
