use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::config::{FacebookConfig, FetchConfig};
use crate::domain::{not_available_message, FeedItem, Fetched, SourceType, TimestampFormat};
use crate::errors::{SourceError, SourceResult};
use crate::sources::traits::{bounded_count, normalize_items, parse_body, FeedSource};
use crate::transport::{HttpRequest, HttpTransport};

/// Graph API `limit` ceiling for list edges
const MAX_COUNT: u32 = 100;

pub const PAGE_INFO_RESOURCE: &str = "Facebook API";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacebookEdge {
    Posts,
    Links,
    Milestones,
    Photos,
}

impl FacebookEdge {
    pub fn path(&self) -> &'static str {
        match self {
            FacebookEdge::Posts => "posts",
            FacebookEdge::Links => "links",
            FacebookEdge::Milestones => "milestones",
            FacebookEdge::Photos => "photos",
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            FacebookEdge::Posts => SourceType::FacebookPosts,
            FacebookEdge::Links => SourceType::FacebookLinks,
            FacebookEdge::Milestones => SourceType::FacebookMilestones,
            FacebookEdge::Photos => SourceType::FacebookPhotos,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphList {
    #[serde(default)]
    data: Vec<Value>,
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    #[serde(default)]
    message: String,
}

/// One list edge of a Facebook object (page posts, links, milestones, or an
/// album's photos).
pub struct FacebookSource {
    transport: Arc<dyn HttpTransport>,
    config: FetchConfig,
    edge: FacebookEdge,
    object_id: String,
}

impl FacebookSource {
    /// Edge of the configured page; photos are read from the album instead and
    /// need one configured.
    pub fn for_edge(
        transport: Arc<dyn HttpTransport>,
        config: &FacebookConfig,
        edge: FacebookEdge,
    ) -> Option<Self> {
        let object_id = match edge {
            FacebookEdge::Photos => config.album_id.clone()?,
            _ => config.fetch.identifier.clone(),
        };

        Some(Self {
            transport,
            config: config.fetch.clone(),
            edge,
            object_id,
        })
    }

    /// URL of the edge, without credentials
    pub fn edge_url(&self) -> String {
        self.config
            .endpoint(&format!("{}/{}", self.object_id, self.edge.path()))
    }

    fn edge_request(&self, count: u32) -> HttpRequest {
        let mut request = HttpRequest::get(self.edge_url());
        if let Some(token) = self.config.credentials.access_token() {
            request = request.with_query("access_token", token);
        }
        request.with_query("limit", bounded_count(count, self.max_count()))
    }
}

impl FeedSource for FacebookSource {
    fn source_type(&self) -> SourceType {
        self.edge.source_type()
    }

    fn identifier(&self) -> &str {
        &self.object_id
    }

    fn max_count(&self) -> u32 {
        MAX_COUNT
    }

    fn default_count(&self) -> u32 {
        self.config.count
    }

    fn fetch_items(&self, count: u32) -> SourceResult<Vec<FeedItem>> {
        let request = self.edge_request(count);
        let response = self.transport.get(&request)?.error_for_status(&request.url)?;

        let list: GraphList = parse_body(&response.body)?;
        if let Some(error) = list.error {
            return Err(SourceError::UnexpectedBody(error.message));
        }

        Ok(normalize_items(
            self.source_type(),
            list.data,
            "created_time",
            TimestampFormat::Iso8601Offset,
        ))
    }
}

/// General information about the configured page, returned as-is.
pub struct FacebookPageInfo {
    transport: Arc<dyn HttpTransport>,
    config: FetchConfig,
}

impl FacebookPageInfo {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &FacebookConfig) -> Self {
        Self {
            transport,
            config: config.fetch.clone(),
        }
    }

    pub fn fetch(&self) -> Fetched<Value> {
        match self.try_fetch() {
            Ok(value) => Fetched::Available(value),
            Err(e) => {
                warn!(page = %self.config.identifier, error = %e, "page info unavailable");
                Fetched::Unavailable(not_available_message(PAGE_INFO_RESOURCE))
            }
        }
    }

    fn try_fetch(&self) -> SourceResult<Value> {
        let mut request = HttpRequest::get(self.config.endpoint(&self.config.identifier));
        if let Some(token) = self.config.credentials.access_token() {
            request = request.with_query("access_token", token);
        }

        let response = self.transport.get(&request)?.error_for_status(&request.url)?;
        let value: Value = parse_body(&response.body)?;

        match &value {
            Value::Object(map) if map.contains_key("error") => Err(SourceError::UnexpectedBody(
                map["error"]["message"].as_str().unwrap_or_default().to_string(),
            )),
            Value::Object(_) => Ok(value),
            _ => Err(SourceError::UnexpectedBody("page info is not an object".to_string())),
        }
    }
}
