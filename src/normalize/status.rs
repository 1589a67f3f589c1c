use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{pretty_duration, relative_phrase};

/// `running` and `timeDiff` as read from `api/stats/current`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatus {
    pub running: bool,
    /// Duration of the last run in nanoseconds.
    pub time_diff_ns: i64,
}

impl RunStatus {
    /// Extract the control fields; anything missing or mistyped reads as
    /// "not running" / zero.
    pub fn from_snapshot(snapshot: &Map<String, Value>) -> Self {
        let running = snapshot
            .get("running")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let time_diff_ns = snapshot
            .get("timeDiff")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(0);
        Self {
            running,
            time_diff_ns,
        }
    }
}

/// Everything the status bar shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBar {
    pub running: bool,
    /// `"Running"` or `"Waiting for next run"`.
    pub state: String,
    /// Relative phrase for the next scheduled run.
    pub next_run: String,
    /// Pretty duration of the last run.
    pub last_run: String,
}

impl StatusBar {
    pub const RUNNING: &'static str = "Running";
    pub const WAITING: &'static str = "Waiting for next run";

    /// Flip to running without waiting for the backend to confirm.
    pub fn mark_running(&mut self) {
        self.running = true;
        self.state = Self::RUNNING.to_string();
    }
}

pub fn status_bar(
    status: RunStatus,
    next_run: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StatusBar {
    StatusBar {
        running: status.running,
        state: if status.running {
            StatusBar::RUNNING
        } else {
            StatusBar::WAITING
        }
        .to_string(),
        next_run: relative_phrase(next_run, now),
        last_run: pretty_duration(status.time_diff_ns),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use super::*;

    fn snapshot(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn reads_control_fields() {
        let s = snapshot(json!({ "running": true, "timeDiff": 3_004_000_000i64, "filesChecked": 3 }));
        let status = RunStatus::from_snapshot(&s);
        assert!(status.running);
        assert_eq!(status.time_diff_ns, 3_004_000_000);
    }

    #[test]
    fn missing_fields_default() {
        let status = RunStatus::from_snapshot(&Map::new());
        assert_eq!(status, RunStatus::default());
    }

    #[test]
    fn idle_status_bar() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let s = snapshot(json!({ "running": false, "timeDiff": 0, "filesChecked": 10 }));
        let bar = status_bar(RunStatus::from_snapshot(&s), Some(now + Duration::hours(2)), now);
        assert!(!bar.running);
        assert_eq!(bar.state, "Waiting for next run");
        assert_eq!(bar.last_run, "0ms");
        assert_eq!(bar.next_run, "in 2 hours");
    }

    #[test]
    fn unscheduled_reads_now() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bar = status_bar(RunStatus::default(), None, now);
        assert_eq!(bar.next_run, "now");
    }

    #[test]
    fn mark_running_updates_label() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut bar = status_bar(RunStatus::default(), None, now);
        bar.mark_running();
        assert!(bar.running);
        assert_eq!(bar.state, "Running");
    }
}
