use crate::errors::{SourceError, SourceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer_token: Option<String>,
    /// Preformatted `Authorization` header, e.g. an OAuth 1.0a signature
    pub authorization: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            bearer_token: None,
            authorization: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    pub fn with_authorization(mut self, header: impl Into<String>) -> Self {
        self.authorization = Some(header.into());
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into an error naming the requested URL
    pub fn error_for_status(self, url: &str) -> SourceResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SourceError::Status {
                status: self.status,
                url: url.to_string(),
            })
        }
    }
}

/// One blocking GET. Implementations return every HTTP status as a response
/// and reserve `Err` for transport failures.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport: Send + Sync {
    fn get(&self, request: &HttpRequest) -> SourceResult<HttpResponse>;
}
