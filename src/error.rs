use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Local store error: {0}")]
    Storage(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl ClientError {
    /// True when the server answered, but with a non-2xx status.
    pub fn is_status(&self) -> bool {
        matches!(self, ClientError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
