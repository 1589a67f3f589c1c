use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiError, BaseUrl, HttpClient};

pub const CURRENT_STATS: &str = "api/stats/current";
pub const SCHEDULE: &str = "api/schedule";
pub const RUN: &str = "api/run";
pub const HISTORICAL_STATS: &str = "api/stats/historical";
pub const BAD_FILES: &str = "api/files/bad";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One entry of `GET api/stats/historical`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    /// Counter name -> value, in the order the backend sent them.
    #[serde(rename = "Data", default, deserialize_with = "null_as_empty_map")]
    pub data: Map<String, Value>,
}

/// One entry of `GET api/files/bad`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadFileRecord {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Data", default, deserialize_with = "null_as_default")]
    pub data: BadFileData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BadFileData {
    #[serde(rename = "fileExt", default)]
    pub file_ext: String,
    #[serde(default)]
    pub reacquire: bool,
    #[serde(default)]
    pub service: String,
}

fn null_as_empty_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D>(deserializer: D) -> Result<BadFileData, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<BadFileData>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Endpoint client
// ---------------------------------------------------------------------------

/// One method per checkrr REST endpoint.
///
/// Methods return the raw wire shapes; reshaping for display happens in
/// [`crate::normalize`]. The backend answers `null` instead of `[]` for
/// empty collections, which is folded into an empty value here.
#[derive(Debug, Clone)]
pub struct CheckrrClient {
    http: HttpClient,
}

impl CheckrrClient {
    pub fn new(base: BaseUrl) -> Self {
        Self {
            http: HttpClient::new(base),
        }
    }

    pub fn base_url(&self) -> &BaseUrl {
        self.http.base_url()
    }

    /// `GET api/stats/current`: run status plus the latest counters.
    pub fn current_stats(&self) -> Result<Map<String, Value>, ApiError> {
        let stats: Option<Map<String, Value>> = self.http.get_json(CURRENT_STATS)?;
        Ok(stats.unwrap_or_default())
    }

    /// `GET api/schedule`: next planned run, a timestamp string or `null`.
    pub fn schedule(&self) -> Result<Value, ApiError> {
        self.http.get(SCHEDULE)
    }

    /// `POST api/run` with `{}`. The reply carries nothing useful.
    pub fn trigger_run(&self) -> Result<(), ApiError> {
        self.http.post(RUN, &serde_json::json!({}))?;
        Ok(())
    }

    /// `GET api/stats/historical`, oldest first.
    pub fn historical_stats(&self) -> Result<Vec<HistoricalPoint>, ApiError> {
        let points: Option<Vec<HistoricalPoint>> = self.http.get_json(HISTORICAL_STATS)?;
        Ok(points.unwrap_or_default())
    }

    /// `GET api/files/bad`.
    pub fn bad_files(&self) -> Result<Vec<BadFileRecord>, ApiError> {
        let files: Option<Vec<BadFileRecord>> = self.http.get_json(BAD_FILES)?;
        Ok(files.unwrap_or_default())
    }

    /// `POST api/files/bad` with the 1-based grid ids to forget.
    ///
    /// The backend resolves ids against its own listing, so they must come
    /// from the most recent fetch. Only tracking records are removed.
    pub fn delete_bad_files(&self, ids: &[usize]) -> Result<(), ApiError> {
        self.http.post(BAD_FILES, ids)?;
        Ok(())
    }
}
