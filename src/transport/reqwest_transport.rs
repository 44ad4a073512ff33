use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::errors::{SourceError, SourceResult};
use crate::transport::traits::{HttpRequest, HttpResponse, HttpTransport};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("labfeeds/", env!("CARGO_PKG_VERSION"));

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, request: &HttpRequest) -> SourceResult<HttpResponse> {
        debug!(url = %request.url, params = request.query.len(), "GET");

        let mut builder = self.client.get(&request.url).query(&request.query);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(header) = &request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, header);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        // Bodies are passed on untouched, so undecodable bytes are an error
        let bytes = response.bytes()?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|e| {
            SourceError::UnexpectedBody(format!("{} sent a body that is not UTF-8: {}", request.url, e))
        })?;

        debug!(url = %request.url, status, bytes = body.len(), "response");
        Ok(HttpResponse::new(status, body))
    }
}
