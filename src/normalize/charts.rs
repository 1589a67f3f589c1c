//! Chart view models: the pie of the latest snapshot and the historical
//! multi-series line chart.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::HistoricalPoint;

/// Fields of `api/stats/current` that describe the run, not file counts.
pub const CONTROL_FIELDS: [&str; 2] = ["running", "timeDiff"];

/// A counter the historical chart knows how to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    /// Series label.
    pub name: &'static str,
    /// Payload keys accepted for this counter, preferred spelling first.
    pub aliases: &'static [&'static str],
}

impl Counter {
    /// Value of this counter in one data point, if any alias is present.
    pub fn read(&self, data: &Map<String, Value>) -> Option<u64> {
        self.aliases
            .iter()
            .find_map(|alias| data.get(*alias))
            .and_then(Value::as_u64)
    }
}

/// Every recognized counter, in series order.
///
/// Older backends misspelled two of these, so both spellings are accepted.
pub const COUNTERS: [Counter; 11] = [
    Counter { name: "sonarrSubmissions", aliases: &["sonarrSubmissions", "sonarrSubmission"] },
    Counter { name: "radarrSubmissions", aliases: &["radarrSubmissions"] },
    Counter { name: "lidarrSubmissions", aliases: &["lidarrSubmissions", "lidarSubmissions"] },
    Counter { name: "filesChecked", aliases: &["filesChecked"] },
    Counter { name: "hashMatches", aliases: &["hashMatches"] },
    Counter { name: "hashMismatches", aliases: &["hashMismatches"] },
    Counter { name: "videoFiles", aliases: &["videoFiles"] },
    Counter { name: "audioFiles", aliases: &["audioFiles"] },
    Counter { name: "unknownFileCount", aliases: &["unknownFileCount"] },
    Counter { name: "unknownFilesDeleted", aliases: &["unknownFilesDeleted"] },
    Counter { name: "nonVideo", aliases: &["nonVideo"] },
];

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Fixed series colors as RGB triples.
pub const PALETTE: [(u8, u8, u8); 11] = [
    (54, 162, 235),
    (255, 99, 132),
    (75, 192, 192),
    (255, 205, 86),
    (153, 102, 255),
    (255, 159, 64),
    (201, 203, 207),
    (46, 204, 113),
    (231, 76, 60),
    (52, 73, 94),
    (241, 196, 15),
];

/// Palette slot for series `index`, wrapping around.
pub fn color_for(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// CSS `rgba()` form of [`color_for`], at the 0.8 fill alpha the charts use.
pub fn css_color_for(index: usize) -> String {
    let (r, g, b) = color_for(index);
    format!("rgba({r}, {g}, {b}, 0.8)")
}

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Data for the "Last Run" pie chart: one series, one slice per counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PieChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

impl PieChart {
    pub const TITLE: &'static str = "Last Run";
    pub const DATASET_LABEL: &'static str = "# of files";

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One line of the historical chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    /// Aligned with [`LineChart::labels`]; `None` is a gap, not a zero.
    pub values: Vec<Option<u64>>,
    pub color: String,
}

/// Data for the "Historical Stats" chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineChart {
    /// One timestamp per input point, in input order.
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl LineChart {
    pub const TITLE: &'static str = "Historical Stats";

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == name)
    }
}

// ---------------------------------------------------------------------------
// Normalizers
// ---------------------------------------------------------------------------

/// Build the pie from the current-stats payload.
///
/// Drops [`CONTROL_FIELDS`] and keeps every other key in payload order,
/// one slice each. Numbers are kept as sent; anything else counts as zero.
pub fn pie_chart(snapshot: &Map<String, Value>) -> PieChart {
    let mut pie = PieChart::default();
    for (key, value) in snapshot {
        if CONTROL_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let count = value.as_f64().unwrap_or_else(|| {
            tracing::debug!(counter = %key, %value, "non-numeric counter shown as zero");
            0.0
        });
        pie.colors.push(css_color_for(pie.labels.len()));
        pie.labels.push(key.clone());
        pie.values.push(count);
    }
    pie
}

/// Build the historical chart, one series per entry of [`COUNTERS`].
pub fn line_chart(points: &[HistoricalPoint]) -> LineChart {
    let labels = points.iter().map(|p| p.timestamp.clone()).collect();
    let series = COUNTERS
        .iter()
        .enumerate()
        .map(|(i, counter)| Series {
            label: counter.name.to_string(),
            values: points.iter().map(|p| counter.read(&p.data)).collect(),
            color: css_color_for(i),
        })
        .collect();
    LineChart { labels, series }
}
