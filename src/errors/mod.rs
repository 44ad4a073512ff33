use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    // Parsing errors
    #[error("Response parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response body: {0}")]
    UnexpectedBody(String),

    // Transport errors raised by non-reqwest transports
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;
