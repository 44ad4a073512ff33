use std::sync::Arc;

use crate::config::Config;
use crate::domain::{FetchResult, Fetched, SourceType, TwitterApi};
use crate::sources::facebook::{FacebookEdge, FacebookSource};
use crate::sources::traits::FeedSource;
use crate::sources::{twitter_v1::TwitterV1Source, twitter_v2::TwitterV2Source, wikipedia::WikipediaSource};
use crate::transport::HttpTransport;

const FACEBOOK_EDGES: [FacebookEdge; 4] = [
    FacebookEdge::Posts,
    FacebookEdge::Links,
    FacebookEdge::Milestones,
    FacebookEdge::Photos,
];

pub struct SourceRegistry {
    sources: Vec<Box<dyn FeedSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register every source the configuration has settings for
    pub fn from_config(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let mut registry = Self::new();

        // The Twitter implementation is picked by API version, not detected
        if let Some(twitter) = &config.twitter {
            match twitter.api {
                TwitterApi::V1 => registry.register(Box::new(TwitterV1Source::new(
                    transport.clone(),
                    twitter.fetch.clone(),
                ))),
                TwitterApi::V2 => registry.register(Box::new(TwitterV2Source::new(
                    transport.clone(),
                    twitter.fetch.clone(),
                ))),
            }
        }

        if let Some(wikipedia) = &config.wikipedia {
            registry.register(Box::new(WikipediaSource::new(
                transport.clone(),
                wikipedia.clone(),
            )));
        }

        if let Some(facebook) = &config.facebook {
            for edge in FACEBOOK_EDGES {
                if let Some(source) = FacebookSource::for_edge(transport.clone(), facebook, edge) {
                    registry.register(Box::new(source));
                }
            }
        }

        registry
    }

    /// Later registrations replace earlier ones of the same type
    pub fn register(&mut self, source: Box<dyn FeedSource>) {
        let source_type = source.source_type();
        self.sources.retain(|s| s.source_type() != source_type);
        self.sources.push(source);
    }

    pub fn find(&self, source_type: SourceType) -> Option<&dyn FeedSource> {
        self.sources
            .iter()
            .find(|s| s.source_type() == source_type)
            .map(|s| s.as_ref())
    }

    pub fn source_types(&self) -> Vec<SourceType> {
        self.sources.iter().map(|s| s.source_type()).collect()
    }

    /// Fetch a feed by type, using the source's configured count when `count` is None
    pub fn fetch_feed(&self, source_type: SourceType, count: Option<u32>) -> FetchResult {
        match self.find(source_type) {
            Some(source) => source.fetch_feed(count.unwrap_or_else(|| source.default_count())),
            None => Fetched::Unavailable(not_configured_message(source_type)),
        }
    }
}

fn not_configured_message(source_type: SourceType) -> String {
    match source_type {
        // Photos come from an album, which the page settings alone don't name
        SourceType::FacebookPhotos => "Facebook album is not configured.".to_string(),
        other => format!("{} is not configured.", other.display_name()),
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
