//! Entry and Log types - the unit of storage under a key
//!
//! Wire format (one blob per key):
//! ```text
//! [
//!   { "timestampMs": 1704103200000, "dateTime": 1704103200000, "value": "10°C" },
//!   ...
//! ]
//! ```
//! A missing or `null` blob decodes to an empty log.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One observation recorded under a key
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry<V> {
    /// When the store appended this entry (unix millis)
    #[serde(rename = "timestampMs")]
    pub recorded_at: i64,

    /// What the value is "about" (unix millis), supplied by the caller
    #[serde(rename = "dateTime")]
    pub effective_date: i64,

    /// Opaque payload
    pub value: V,
}

impl<V> Entry<V> {
    /// Create a new entry
    pub fn new(recorded_at: i64, effective_date: i64, value: V) -> Self {
        Entry {
            recorded_at,
            effective_date,
            value,
        }
    }
}

/// The append-only history for one key, in insertion order
#[derive(Clone, Debug, PartialEq)]
pub struct Log<V> {
    entries: Vec<Entry<V>>,
}

impl<V> Log<V> {
    /// An empty log (the state of a never-written key)
    pub fn new() -> Self {
        Log {
            entries: Vec::new(),
        }
    }

    /// Append an entry at the end
    pub fn push(&mut self, entry: Entry<V>) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently inserted entry
    pub fn last(&self) -> Option<&Entry<V>> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry<V>> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entry<V>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry<V>> {
        self.entries
    }

    /// Payloads only, in log order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Keep only the entries matching `predicate`, preserving order
    pub(crate) fn retain(&mut self, predicate: impl FnMut(&Entry<V>) -> bool) {
        self.entries.retain(predicate);
    }
}

impl<V: Serialize> Log<V> {
    /// Encode to the wire format
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }
}

impl<V: DeserializeOwned> Log<V> {
    /// Decode a raw blob; `None` and `"null"` both mean an empty log
    pub fn decode(raw: Option<&str>) -> serde_json::Result<Self> {
        let entries = match raw {
            None => None,
            Some(raw) => serde_json::from_str::<Option<Vec<Entry<V>>>>(raw)?,
        };
        Ok(Log {
            entries: entries.unwrap_or_default(),
        })
    }
}

impl<V> Default for Log<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<Vec<Entry<V>>> for Log<V> {
    fn from(entries: Vec<Entry<V>>) -> Self {
        Log { entries }
    }
}

impl<V> IntoIterator for Log<V> {
    type Item = Entry<V>;
    type IntoIter = std::vec::IntoIter<Entry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Log<V> {
    type Item = &'a Entry<V>;
    type IntoIter = std::slice::Iter<'a, Entry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_absent_is_empty() {
        let log: Log<String> = Log::decode(None).unwrap();
        assert!(log.is_empty());

        let log: Log<String> = Log::decode(Some("null")).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_wire_field_names() {
        let mut log = Log::new();
        log.push(Entry::new(10, 20, "x".to_string()));

        let encoded: serde_json::Value = serde_json::from_str(&log.encode().unwrap()).unwrap();
        assert_eq!(
            encoded,
            json!([{ "timestampMs": 10, "dateTime": 20, "value": "x" }])
        );
    }

    #[test]
    fn test_decode_existing_blob() {
        let raw = r#"[{"timestampMs":1,"dateTime":2,"value":{"temp":10}},
                      {"timestampMs":3,"dateTime":4,"value":{"temp":12}}]"#;
        let log: Log<serde_json::Value> = Log::decode(Some(raw)).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().recorded_at, 3);
        assert_eq!(log.last().unwrap().value["temp"], 12);
    }

    #[test]
    fn test_decode_malformed_fails() {
        assert!(Log::<String>::decode(Some("{not json")).is_err());
        assert!(Log::<String>::decode(Some(r#"{"timestampMs":1}"#)).is_err());
    }

    #[test]
    fn test_values_in_order() {
        let log: Log<i32> = vec![Entry::new(1, 1, 7), Entry::new(2, 2, 8)].into();
        assert_eq!(log.values().copied().collect::<Vec<_>>(), vec![7, 8]);
    }
}
