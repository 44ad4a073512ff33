use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::config::FetchConfig;
use crate::domain::{FeedItem, SourceType, TimestampFormat};
use crate::errors::{SourceError, SourceResult};
use crate::sources::traits::{bounded_count, normalize_items, parse_body, FeedSource};
use crate::transport::{HttpRequest, HttpTransport};

/// `uclimit` ceiling for ordinary (non-bot) API clients
const MAX_COUNT: u32 = 500;

#[derive(Debug, Deserialize)]
struct ContributionsResponse {
    query: Option<ContributionsQuery>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ContributionsQuery {
    #[serde(default)]
    usercontribs: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

/// Recent edits by one Wikipedia user, via the MediaWiki `usercontribs` list.
pub struct WikipediaSource {
    transport: Arc<dyn HttpTransport>,
    config: FetchConfig,
}

impl WikipediaSource {
    pub fn new(transport: Arc<dyn HttpTransport>, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    fn contributions_request(&self, count: u32) -> HttpRequest {
        HttpRequest::get(self.config.endpoint("w/api.php"))
            .with_query("action", "query")
            .with_query("list", "usercontribs")
            .with_query("ucuser", &self.config.identifier)
            .with_query("uclimit", bounded_count(count, self.max_count()))
            .with_query("ucprop", "ids|title|timestamp|comment|size")
            .with_query("format", "json")
    }
}

impl FeedSource for WikipediaSource {
    fn source_type(&self) -> SourceType {
        SourceType::Wikipedia
    }

    fn identifier(&self) -> &str {
        &self.config.identifier
    }

    fn max_count(&self) -> u32 {
        MAX_COUNT
    }

    fn default_count(&self) -> u32 {
        self.config.count
    }

    fn fetch_items(&self, count: u32) -> SourceResult<Vec<FeedItem>> {
        let request = self.contributions_request(count);
        let response = self.transport.get(&request)?.error_for_status(&request.url)?;

        // MediaWiki reports bad parameters with a 200 and an `error` member
        let parsed: ContributionsResponse = parse_body(&response.body)?;
        if let Some(error) = parsed.error {
            return Err(SourceError::UnexpectedBody(format!(
                "{}: {}",
                error.code, error.info
            )));
        }

        let query = parsed
            .query
            .ok_or_else(|| SourceError::UnexpectedBody("missing query member".to_string()))?;

        Ok(normalize_items(
            SourceType::Wikipedia,
            query.usercontribs,
            "timestamp",
            TimestampFormat::Iso8601Utc,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fetched;
    use crate::transport::{HttpResponse, MockHttpTransport};

    fn source(mock: MockHttpTransport) -> WikipediaSource {
        WikipediaSource::new(
            Arc::new(mock),
            FetchConfig::new("https://en.wikipedia.org", "LabBot"),
        )
    }

    const CONTRIBS: &str = r#"{
        "batchcomplete": "",
        "query": {
            "usercontribs": [
                {"userid": 7, "user": "LabBot", "pageid": 11, "revid": 901, "ns": 0,
                 "title": "Insulin signaling", "timestamp": "2021-03-02T12:00:00Z", "comment": "refs", "size": 5120},
                {"userid": 7, "user": "LabBot", "pageid": 12, "revid": 900, "ns": 0,
                 "title": "Adipocyte", "timestamp": "2021-03-01T08:05:09Z", "comment": "typo", "size": 2048}
            ]
        }
    }"#;

    #[test]
    fn test_request_shape_and_items() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .withf(|req| {
                req.url == "https://en.wikipedia.org/w/api.php"
                    && req.query_value("list") == Some("usercontribs")
                    && req.query_value("ucuser") == Some("LabBot")
                    && req.query_value("uclimit") == Some("500")
                    && req.query_value("format") == Some("json")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, CONTRIBS)));

        let items = source(mock).fetch_items(1000).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get_str("title"), Some("Insulin signaling"));
        assert_eq!(items[1].timestamp.to_string(), "2021-03-01 08:05:09");
    }

    #[test]
    fn test_api_error_falls_back() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get().returning(|_| {
            Ok(HttpResponse::new(
                200,
                r#"{"error": {"code": "baduser_ucuser", "info": "Invalid value \"LabBot\" for user parameter \"ucuser\"."}}"#,
            ))
        });

        assert_eq!(
            source(mock).fetch_feed(10),
            Fetched::Unavailable(
                "No response from Wikipedia. Are you sure LabBot is valid?".to_string()
            )
        );
    }

    #[test]
    fn test_user_without_edits() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .returning(|_| Ok(HttpResponse::new(200, r#"{"query": {"usercontribs": []}}"#)));

        assert_eq!(source(mock).fetch_feed(10), Fetched::Available(Vec::new()));
    }
}
