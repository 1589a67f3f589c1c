//! Diagnostic logging to stderr.
//!
//! Stdout carries command output (tables, JSON, CSV), so all tracing goes
//! to stderr. Safe to call more than once; only the first call installs a
//! subscriber.

use tracing::Level;

use crate::config::LogLevel;

pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(to_tracing(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn to_tracing(level: LogLevel) -> Level {
    match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}
