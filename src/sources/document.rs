use std::sync::Arc;

use tracing::warn;

use crate::config::validate_http_url;
use crate::domain::{not_available_message, DocumentResult, Fetched};
use crate::errors::SourceResult;
use crate::transport::{HttpRequest, HttpTransport};

/// Fetches a single remote document (e.g. a Markdown policy) as raw text.
pub struct DocumentFetcher {
    transport: Arc<dyn HttpTransport>,
}

impl DocumentFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// `resource` names the document in the fallback message. The body is
    /// returned exactly as received; escaping is left to whoever renders it.
    pub fn fetch_document(&self, resource: &str, url: &str) -> DocumentResult {
        match self.try_fetch(url) {
            Ok(text) => Fetched::Available(text),
            Err(e) => {
                warn!(resource, url, error = %e, "document unavailable");
                Fetched::Unavailable(not_available_message(resource))
            }
        }
    }

    fn try_fetch(&self, url: &str) -> SourceResult<String> {
        validate_http_url(url)?;

        let response = self
            .transport
            .get(&HttpRequest::get(url))?
            .error_for_status(url)?;

        Ok(response.body)
    }
}
