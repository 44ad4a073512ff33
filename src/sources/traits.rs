use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domain::{no_response_message, FeedItem, FetchResult, Fetched, SourceType, TimestampFormat};
use crate::errors::SourceResult;

pub trait FeedSource: Send + Sync {
    /// Identifies this source type
    fn source_type(&self) -> SourceType;

    /// Account, user or page the source is queried for
    fn identifier(&self) -> &str;

    /// Largest item count the upstream API accepts in one call
    fn max_count(&self) -> u32;

    /// Item count used when the caller does not ask for one
    fn default_count(&self) -> u32;

    /// Fetch and normalize items, reporting failures as errors
    fn fetch_items(&self, count: u32) -> SourceResult<Vec<FeedItem>>;

    /// Fetch items, turning every failure into the source's fallback message
    fn fetch_feed(&self, count: u32) -> FetchResult {
        match self.fetch_items(count) {
            Ok(items) => Fetched::Available(items),
            Err(e) => {
                warn!(
                    source = %self.source_type(),
                    identifier = self.identifier(),
                    error = %e,
                    "feed unavailable"
                );
                Fetched::Unavailable(no_response_message(
                    self.source_type().display_name(),
                    self.identifier(),
                ))
            }
        }
    }
}

/// Count actually sent upstream
pub fn bounded_count(requested: u32, max: u32) -> u32 {
    requested.min(max)
}

pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> SourceResult<T> {
    Ok(serde_json::from_str(body)?)
}

/// Attach normalized timestamps, keeping upstream order.
///
/// Items that are not objects or whose timestamp does not parse are skipped.
pub(crate) fn normalize_items(
    source: SourceType,
    values: Vec<Value>,
    field: &str,
    format: TimestampFormat,
) -> Vec<FeedItem> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let Value::Object(fields) = value else {
                warn!(source = %source, index, "skipping non-object item");
                return None;
            };

            match FeedItem::from_object(fields, field, format) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(source = %source, index, error = %e, "skipping item with malformed timestamp");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bounded_count() {
        assert_eq!(bounded_count(10, 100), 10);
        assert_eq!(bounded_count(250, 100), 100);
        assert_eq!(bounded_count(100, 100), 100);
    }

    #[test]
    fn test_normalize_items_skips_malformed_and_keeps_order() {
        let values = vec![
            json!({ "id": "a", "timestamp": "2020-01-01T00:00:00Z" }),
            json!({ "id": "b", "timestamp": "last tuesday" }),
            json!("not an object"),
            json!({ "id": "c", "timestamp": "2020-01-03T00:00:00Z" }),
        ];

        let items = normalize_items(
            SourceType::Wikipedia,
            values,
            "timestamp",
            TimestampFormat::Iso8601Utc,
        );

        let ids: Vec<_> = items.iter().filter_map(|i| i.get_str("id")).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
