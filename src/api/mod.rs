//! HTTP access to the checkrr backend.
//!
//! [`HttpClient`] is the deliberately minimal wrapper: one GET or POST, JSON
//! in and out, a single error type. No retry, no timeout, no caching. Every
//! call is one best-effort round trip and the pollers own the cadence.
//!
//! [`CheckrrClient`] layers one method per backend endpoint on top of it.

mod checkrr;
mod error;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use checkrr::{
    BAD_FILES, BadFileData, BadFileRecord, CURRENT_STATS, CheckrrClient, HISTORICAL_STATS,
    HistoricalPoint, RUN, SCHEDULE,
};
pub use error::ApiError;

// ---------------------------------------------------------------------------
// Base URL
// ---------------------------------------------------------------------------

/// Root the dashboard is deployed under, always ending in `/`.
///
/// The backend may be mounted below a sub-path (`http://nas:8585/checkrr/`),
/// so endpoint paths are joined relative to this root rather than to the
/// host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Validate the scheme and enforce the trailing slash.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        let has_host = lower
            .strip_prefix("http://")
            .or_else(|| lower.strip_prefix("https://"))
            .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'));
        if !has_host {
            return Err(ApiError::InvalidBaseUrl(raw.to_string()));
        }

        if trimmed.ends_with('/') {
            Ok(Self(trimmed.to_string()))
        } else {
            Ok(Self(format!("{trimmed}/")))
        }
    }

    /// Resolve an endpoint path against the root.
    ///
    /// Leading `/` and `./` are ignored so `"/api/run"`, `"./api/run"` and
    /// `"api/run"` all land below the configured sub-path.
    pub fn join(&self, path: &str) -> String {
        let relative = path.trim_start_matches("./").trim_start_matches('/');
        format!("{}{relative}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous JSON-over-HTTP client bound to one [`BaseUrl`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: BaseUrl,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(base: BaseUrl) -> Self {
        Self {
            base,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    /// `GET path` and return the parsed JSON body.
    pub fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.get_json(path)
    }

    /// `GET path` and deserialize the body into `T`.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.base.join(path);
        tracing::trace!(%url, "GET");
        read_json(&url, self.agent.get(&url).call())
    }

    /// `POST path` with `body` serialized as JSON; returns the parsed reply.
    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.post_json(path, body)
    }

    /// `POST path` with a JSON body and deserialize the reply into `T`.
    pub fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.base.join(path);
        tracing::trace!(%url, "POST");
        // send_json sets `Content-Type: application/json`.
        read_json(&url, self.agent.post(&url).send_json(body))
    }
}

/// Turn a ureq outcome into parsed JSON or an [`ApiError`].
fn read_json<T: DeserializeOwned>(
    url: &str,
    outcome: Result<ureq::Response, ureq::Error>,
) -> Result<T, ApiError> {
    let response = match outcome {
        Ok(response) => response,
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            return Err(ApiError::Request { status, body });
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(ApiError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            });
        }
    };

    let text = response.into_string().map_err(|e| ApiError::Transport {
        url: url.to_string(),
        message: format!("failed reading response body: {e}"),
    })?;

    decode_body(url, &text)
}

/// Parse a response body. An empty body is read as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(url: &str, text: &str) -> Result<T, ApiError> {
    let text = text.trim();
    let text = if text.is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_enforces_trailing_slash() {
        let base = BaseUrl::parse("http://localhost:8585").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8585/");

        let base = BaseUrl::parse("https://nas.lan/checkrr/").unwrap();
        assert_eq!(base.as_str(), "https://nas.lan/checkrr/");
    }

    #[test]
    fn base_url_rejects_non_http() {
        assert!(BaseUrl::parse("ftp://nas.lan/").is_err());
        assert!(BaseUrl::parse("localhost:8585").is_err());
        assert!(BaseUrl::parse("http://").is_err());
        assert!(BaseUrl::parse("").is_err());
    }

    #[test]
    fn join_stays_below_sub_path() {
        let base = BaseUrl::parse("http://nas.lan/checkrr").unwrap();
        assert_eq!(base.join("api/run"), "http://nas.lan/checkrr/api/run");
        assert_eq!(base.join("/api/run"), "http://nas.lan/checkrr/api/run");
        assert_eq!(base.join("./api/files/bad"), "http://nas.lan/checkrr/api/files/bad");
    }

    #[test]
    fn decode_body_treats_empty_as_null() {
        let value: Value = decode_body("http://x/", "").unwrap();
        assert!(value.is_null());
        let value: Value = decode_body("http://x/", "  \n").unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn decode_body_reports_malformed_json() {
        let err = decode_body::<Value>("http://x/api/schedule", "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref url, .. } if url == "http://x/api/schedule"));
    }
}
