use serde::Serialize;

use super::FeedItem;

/// Outcome of one fetch: the payload, or the message to show in its place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fetched<T> {
    Available(T),
    Unavailable(String),
}

pub type FetchResult = Fetched<Vec<FeedItem>>;
pub type DocumentResult = Fetched<String>;

impl<T> Fetched<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Fetched::Available(_))
    }

    pub fn available(self) -> Option<T> {
        match self {
            Fetched::Available(value) => Some(value),
            Fetched::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Fetched::Available(_) => None,
            Fetched::Unavailable(reason) => Some(reason),
        }
    }
}

/// Fallback shown when a feed source could not be read.
pub fn no_response_message(source: &str, identifier: &str) -> String {
    format!("No response from {}. Are you sure {} is valid?", source, identifier)
}

/// Fallback shown when a single resource could not be read.
pub fn not_available_message(resource: &str) -> String {
    format!("{} is not Available.", resource)
}
