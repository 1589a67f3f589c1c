//! Raw checkrr payloads -> display-ready view models.
//!
//! Everything here is pure: no I/O, and the clock is passed in, so the
//! pollers, the terminal renderer and the web endpoints all share one set
//! of shapes.

pub mod charts;
mod duration;
mod files;
mod schedule;
mod status;

pub use charts::{Counter, COUNTERS, LineChart, PieChart, Series, line_chart, pie_chart};
pub use duration::pretty_duration;
pub use files::{BadFileRow, bad_file_rows};
pub use schedule::{NO_SCHEDULE, parse_schedule, relative_phrase};
pub use status::{RunStatus, StatusBar, status_bar};
