//! Per-view polling.
//!
//! Each mounted view gets a [`Poller`] running on its own named thread. The
//! poller performs one fetch immediately, then one per interval, and writes
//! results into the view's [`ViewCell`]. Views never share a thread or a
//! cell, so a failing or slow backend endpoint only stalls its own view.
//!
//! Stopping a poller wakes its sleep at once and closes the cell. A request
//! that is already in flight is left to finish (there is no timeout to cut
//! it short), but its response is discarded.

mod cell;

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::api::ApiError;

pub use cell::{Ticket, ViewCell};

/// Default fetch cadence.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Guard against zero or tiny configured intervals turning into a busy loop.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Something a view polls: one fetch-and-normalize cycle.
pub trait Source: Send + Sync + 'static {
    type Model: Clone + Send + 'static;

    /// Short name used for the thread and in logs.
    fn name(&self) -> &'static str;

    /// Fetch from the backend and normalize into the view model.
    fn fetch(&self) -> Result<Self::Model, ApiError>;
}

/// Run one cycle: take a ticket, fetch, apply if still current.
///
/// Returns whether the fetched model was applied. Fetch errors propagate and
/// leave the cell untouched.
pub fn refresh<S: Source + ?Sized>(source: &S, cell: &ViewCell<S::Model>) -> Result<bool, ApiError> {
    let ticket = cell.begin();
    let model = source.fetch()?;
    let applied = cell.apply(ticket, model);
    if !applied {
        tracing::debug!(view = source.name(), seq = ticket.seq(), "discarded stale response");
    }
    Ok(applied)
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

/// Drives [`refresh`] for one view at a fixed interval.
pub struct Poller<S: Source> {
    source: Arc<S>,
    cell: ViewCell<S::Model>,
    interval: Duration,
}

impl<S: Source> Poller<S> {
    pub fn new(source: Arc<S>, cell: ViewCell<S::Model>) -> Self {
        Self {
            source,
            cell,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Override the interval, clamped to [`MIN_INTERVAL`].
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the polling thread. The first fetch happens right away.
    pub fn start(self) -> std::io::Result<PollHandle> {
        let name = self.source.name();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let cell = self.cell.clone();

        let join = thread::Builder::new()
            .name(format!("poll-{name}"))
            .spawn(move || self.run(stop_rx))?;

        Ok(PollHandle {
            name,
            stop_tx: Some(stop_tx),
            join: Some(join),
            close: Box::new(move || cell.close()),
        })
    }

    fn run(self, stop_rx: mpsc::Receiver<()>) {
        let name = self.source.name();
        tracing::debug!(view = name, interval_ms = self.interval.as_millis() as u64, "poller started");

        loop {
            if let Err(err) = refresh(self.source.as_ref(), &self.cell) {
                tracing::warn!(view = name, error = %err, "poll cycle failed; keeping previous state");
            }

            match stop_rx.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        tracing::debug!(view = name, "poller stopped");
    }
}

/// Handle to a running [`Poller`]. Dropping it stops the poller.
pub struct PollHandle {
    name: &'static str,
    stop_tx: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
    close: Box<dyn Fn() + Send + Sync>,
}

impl PollHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Cancel the schedule and close the view's cell. Does not wait for an
    /// in-flight request.
    pub fn stop(&mut self) {
        (self.close)();
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the polling thread to exit (after [`stop`](Self::stop)).
    pub fn join(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }

    /// True once the polling thread has exited.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
