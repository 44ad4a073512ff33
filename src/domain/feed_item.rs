use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use super::timestamp::{normalize, TimestampError, TimestampFormat};

/// One upstream item with its normalized timestamp attached.
///
/// `fields` is the object exactly as the source returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(rename = "normalized_at")]
    pub timestamp: NaiveDateTime,
}

impl FeedItem {
    pub fn new(fields: Map<String, Value>, timestamp: NaiveDateTime) -> Self {
        Self { fields, timestamp }
    }

    /// Build an item from a raw JSON object, reading its timestamp from `field`.
    pub fn from_object(
        fields: Map<String, Value>,
        field: &str,
        format: TimestampFormat,
    ) -> Result<Self, TimestampError> {
        let raw = fields.get(field).and_then(Value::as_str).unwrap_or_default();
        let timestamp = normalize(raw, format)?;
        Ok(Self::new(fields, timestamp))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_from_object_keeps_original_fields() {
        let fields = object(json!({
            "id": "1050118621198921728",
            "text": "hello",
            "created_at": "Wed Oct 10 20:19:24 +0000 2018"
        }));

        let item = FeedItem::from_object(fields.clone(), "created_at", TimestampFormat::TwitterV1)
            .unwrap();

        assert_eq!(item.fields, fields);
        assert_eq!(item.get_str("text"), Some("hello"));
        assert_eq!(item.timestamp.to_string(), "2018-10-10 20:19:24");
    }

    #[test]
    fn test_missing_timestamp_field_is_an_error() {
        let fields = object(json!({ "text": "no date" }));
        assert!(FeedItem::from_object(fields, "created_at", TimestampFormat::TwitterV1).is_err());
    }

    #[test]
    fn test_serializes_flat_with_normalized_field() {
        let fields = object(json!({ "title": "Talk:Rust", "timestamp": "2021-03-01T08:05:09Z" }));
        let item = FeedItem::from_object(fields, "timestamp", TimestampFormat::Iso8601Utc).unwrap();

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["title"], "Talk:Rust");
        assert_eq!(value["timestamp"], "2021-03-01T08:05:09Z");
        assert_eq!(value["normalized_at"], "2021-03-01T08:05:09");
    }
}
