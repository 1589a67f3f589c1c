use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::api::{ApiError, CheckrrClient};
use crate::normalize::{
    self, BadFileRow, LineChart, PieChart, RunStatus, StatusBar, parse_schedule,
};
use crate::poll::Source;

/// Status bar: `api/stats/current` + `api/schedule`.
///
/// Both requests belong to one cycle; if either fails the cycle fails and
/// the previous status stays on screen.
pub struct StatusSource {
    client: Arc<CheckrrClient>,
}

impl StatusSource {
    pub fn new(client: Arc<CheckrrClient>) -> Self {
        Self { client }
    }
}

impl Source for StatusSource {
    type Model = StatusBar;

    fn name(&self) -> &'static str {
        "status"
    }

    fn fetch(&self) -> Result<StatusBar, ApiError> {
        let snapshot = self.client.current_stats()?;
        let schedule = self.client.schedule()?;
        Ok(normalize::status_bar(
            RunStatus::from_snapshot(&snapshot),
            parse_schedule(&schedule),
            Utc::now(),
        ))
    }
}

/// Both charts of the stats panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsModel {
    pub pie: PieChart,
    pub line: LineChart,
}

/// Stats panel: `api/stats/current` + `api/stats/historical`.
pub struct StatsSource {
    client: Arc<CheckrrClient>,
}

impl StatsSource {
    pub fn new(client: Arc<CheckrrClient>) -> Self {
        Self { client }
    }
}

impl Source for StatsSource {
    type Model = StatsModel;

    fn name(&self) -> &'static str {
        "stats"
    }

    fn fetch(&self) -> Result<StatsModel, ApiError> {
        let snapshot = self.client.current_stats()?;
        let history = self.client.historical_stats()?;
        Ok(StatsModel {
            pie: normalize::pie_chart(&snapshot),
            line: normalize::line_chart(&history),
        })
    }
}

/// Bad-files grid: `api/files/bad`.
pub struct FilesSource {
    client: Arc<CheckrrClient>,
}

impl FilesSource {
    pub fn new(client: Arc<CheckrrClient>) -> Self {
        Self { client }
    }
}

impl Source for FilesSource {
    type Model = Vec<BadFileRow>;

    fn name(&self) -> &'static str {
        "files"
    }

    fn fetch(&self) -> Result<Vec<BadFileRow>, ApiError> {
        let records = self.client.bad_files()?;
        Ok(normalize::bad_file_rows(&records))
    }
}
