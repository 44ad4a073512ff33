use std::sync::Arc;

use serde_json::Value;

use crate::config::FetchConfig;
use crate::domain::{FeedItem, SourceType, TimestampFormat};
use crate::errors::SourceResult;
use crate::sources::traits::{bounded_count, normalize_items, parse_body, FeedSource};
use crate::transport::{HttpRequest, HttpTransport};

/// statuses/user_timeline caps `count` at 200
const MAX_COUNT: u32 = 200;

/// v1.1 user timeline: one call, the body is a bare array of tweets.
///
/// Requests are OAuth 1.0a signed when keys are configured and sent bare
/// otherwise.
pub struct TwitterV1Source {
    transport: Arc<dyn HttpTransport>,
    config: FetchConfig,
}

impl TwitterV1Source {
    pub fn new(transport: Arc<dyn HttpTransport>, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    fn timeline_request(&self, count: u32) -> HttpRequest {
        HttpRequest::get(self.config.endpoint("1.1/statuses/user_timeline.json"))
            .with_query("screen_name", &self.config.identifier)
            .with_query("count", bounded_count(count, self.max_count()))
            .with_query("include_rts", "true")
            .with_query("trim_user", "true")
            .with_query("exclude_replies", "true")
    }
}

impl FeedSource for TwitterV1Source {
    fn source_type(&self) -> SourceType {
        SourceType::Twitter
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
        let mut request = self.timeline_request(count);
        if let Some(keys) = self.config.credentials.oauth1() {
            request = keys.sign(request)?;
        }
        let response = self.transport.get(&request)?.error_for_status(&request.url)?;

        let tweets: Vec<Value> = parse_body(&response.body)?;

        Ok(normalize_items(
            SourceType::Twitter,
            tweets,
            "created_at",
            TimestampFormat::TwitterV1,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::domain::Fetched;
    use crate::transport::{HttpResponse, MockHttpTransport, OAuth1Keys};

    fn source(mock: MockHttpTransport) -> TwitterV1Source {
        TwitterV1Source::new(
            Arc::new(mock),
            FetchConfig::new("https://api.twitter.com", "labhandle"),
        )
    }

    const TIMELINE: &str = r#"[
        {"id_str": "2", "text": "newer", "created_at": "Thu Oct 11 09:00:00 +0000 2018"},
        {"id_str": "1", "text": "older", "created_at": "Wed Oct 10 20:19:24 +0000 2018"}
    ]"#;

    #[test]
    fn test_request_shape() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .withf(|req| {
                req.url == "https://api.twitter.com/1.1/statuses/user_timeline.json"
                    && req.query_value("screen_name") == Some("labhandle")
                    && req.query_value("count") == Some("200")
                    && req.query_value("exclude_replies") == Some("true")
                    && req.query_value("trim_user") == Some("true")
                    && req.bearer_token.is_none()
                    && req.authorization.is_none()
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, TIMELINE)));

        let items = source(mock).fetch_items(500).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_oauth_keys_sign_the_request() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .withf(|req| {
                let header = req.authorization.as_deref().unwrap_or_default();
                header.starts_with("OAuth ")
                    && header.contains(r#"oauth_consumer_key="consumer-key""#)
                    && header.contains(r#"oauth_token="access-token""#)
                    && header.contains(r#"oauth_signature_method="HMAC-SHA1""#)
                    && header.contains("oauth_signature=")
                    && !header.contains("consumer-secret")
                    && req.bearer_token.is_none()
                    && req.query_value("screen_name") == Some("labhandle")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, TIMELINE)));

        let config = FetchConfig::new("https://api.twitter.com", "labhandle").with_credentials(
            Credentials::OAuth1(OAuth1Keys {
                consumer_key: "consumer-key".to_string(),
                consumer_secret: "consumer-secret".to_string(),
                token: "access-token".to_string(),
                token_secret: "token-secret".to_string(),
            }),
        );
        let source = TwitterV1Source::new(Arc::new(mock), config);

        assert_eq!(source.fetch_items(20).unwrap().len(), 2);
    }

    #[test]
    fn test_items_keep_order_and_fields() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .returning(|_| Ok(HttpResponse::new(200, TIMELINE)));

        let items = source(mock).fetch_items(20).unwrap();

        assert_eq!(items[0].get_str("text"), Some("newer"));
        assert_eq!(items[1].get_str("text"), Some("older"));
        assert_eq!(items[1].timestamp.to_string(), "2018-10-10 20:19:24");
        assert_eq!(
            items[1].get_str("created_at"),
            Some("Wed Oct 10 20:19:24 +0000 2018")
        );
    }

    #[test]
    fn test_not_found_falls_back() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .returning(|_| Ok(HttpResponse::new(404, r#"{"errors":[{"code":34}]}"#)));

        assert_eq!(
            source(mock).fetch_feed(20),
            Fetched::Unavailable(
                "No response from Twitter. Are you sure labhandle is valid?".to_string()
            )
        );
    }

    #[test]
    fn test_object_body_falls_back() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .returning(|_| Ok(HttpResponse::new(200, r#"{"error": "Not authorized."}"#)));

        assert!(!source(mock).fetch_feed(20).is_available());
    }
}
