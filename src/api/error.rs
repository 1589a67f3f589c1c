use thiserror::Error;

/// Failure of a single round trip to the checkrr backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP error! status: {status}, {body}")]
    Request { status: u16, body: String },

    /// The request never produced a response (connect refused, DNS, reset).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body was not valid JSON for the expected shape.
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{0}': expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// True for both HTTP-level and network-level failures.
    ///
    /// Pollers and actions treat the two the same way, so most callers only
    /// ever need this distinction against [`ApiError::Decode`].
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::Transport { .. })
    }

    /// HTTP status code, when the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}
