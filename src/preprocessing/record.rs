//! Raw request record

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Feature, FeatureValue};

/// One request's attributes before transformation.
///
/// Keeps fields in insertion order so that imputation reports are
/// deterministic. Null and empty-string values are both stored as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, Option<FeatureValue>)>,
}

impl RawRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a present value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Builder method to set an explicitly missing value
    pub fn with_missing(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    /// Set a field. Re-setting an existing field keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<FeatureValue>) {
        let name = name.into();
        let value = value.filter(|v| !v.is_blank());
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Value of a field, `None` if missing or not present
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Value of a canonical feature
    pub fn value(&self, feature: Feature) -> Option<&FeatureValue> {
        self.get(feature.name())
    }

    /// Whether the record carries the field at all (even as missing)
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Iterate fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&FeatureValue>)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<FeatureValue>)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, Option<FeatureValue>)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = RawRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of feature names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<RawRecord, A::Error> {
                let mut record = RawRecord::new();
                while let Some((name, value)) = map.next_entry::<String, Option<FeatureValue>>()? {
                    record.insert(name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
