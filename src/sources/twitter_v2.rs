use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::FetchConfig;
use crate::domain::{FeedItem, SourceType, TimestampFormat};
use crate::errors::{SourceError, SourceResult};
use crate::sources::traits::{bounded_count, normalize_items, parse_body, FeedSource};
use crate::transport::{HttpRequest, HttpTransport};

/// /2/users/:id/tweets caps `max_results` at 100
const MAX_COUNT: u32 = 100;

#[derive(Debug, Deserialize)]
struct UserLookup {
    data: Option<UserData>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    errors: Vec<Value>,
}

/// Bearer-token v2 timeline: resolve the handle to a user id, then read that
/// user's tweets. A failed lookup means the timeline call is never made.
pub struct TwitterV2Source {
    transport: Arc<dyn HttpTransport>,
    config: FetchConfig,
}

impl TwitterV2Source {
    pub fn new(transport: Arc<dyn HttpTransport>, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    fn lookup_request(&self) -> HttpRequest {
        HttpRequest::get(
            self.config
                .endpoint(&format!("2/users/by/username/{}", self.config.identifier)),
        )
        .with_bearer_token(self.config.credentials.bearer())
    }

    fn timeline_request(&self, user_id: &str, count: u32) -> HttpRequest {
        HttpRequest::get(self.config.endpoint(&format!("2/users/{}/tweets", user_id)))
            .with_query("max_results", bounded_count(count, self.max_count()))
            .with_query("exclude", "replies")
            .with_query("tweet.fields", "created_at")
            .with_bearer_token(self.config.credentials.bearer())
    }

    fn resolve_user_id(&self) -> SourceResult<String> {
        let request = self.lookup_request();
        let response = self.transport.get(&request)?.error_for_status(&request.url)?;

        let lookup: UserLookup = parse_body(&response.body)?;
        match lookup.data {
            Some(user) => Ok(user.id),
            None => Err(SourceError::UnexpectedBody(format!(
                "user lookup returned no data ({} errors)",
                lookup.errors.len()
            ))),
        }
    }
}

impl FeedSource for TwitterV2Source {
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
        let user_id = self.resolve_user_id()?;
        debug!(handle = %self.config.identifier, user_id = %user_id, "resolved Twitter user");

        let request = self.timeline_request(&user_id, count);
        let response = self.transport.get(&request)?.error_for_status(&request.url)?;

        let timeline: Timeline = parse_body(&response.body)?;
        if timeline.data.is_empty() && !timeline.errors.is_empty() {
            return Err(SourceError::UnexpectedBody(format!(
                "timeline returned {} errors",
                timeline.errors.len()
            )));
        }

        Ok(normalize_items(
            SourceType::Twitter,
            timeline.data,
            "created_at",
            TimestampFormat::Iso8601Millis,
        ))
    }
}
