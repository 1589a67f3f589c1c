use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::api::{ApiError, CheckrrClient};
use crate::normalize::{self, BadFileRow, RunStatus, StatusBar};
use crate::poll::{self, PollHandle, Poller, Source, ViewCell};

use super::{DashError, FilesSource, StatsModel, StatsSource, StatusSource};

/// One view: its source, its state and, while mounted, its poller.
struct Mounted<S: Source> {
    source: Arc<S>,
    cell: ViewCell<S::Model>,
    poller: Option<PollHandle>,
}

impl<S: Source> Mounted<S> {
    fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            cell: ViewCell::new(),
            poller: None,
        }
    }

    fn start(&mut self, interval: Duration) -> std::io::Result<()> {
        let handle = Poller::new(Arc::clone(&self.source), self.cell.clone())
            .with_interval(interval)
            .start()?;
        self.poller = Some(handle);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut handle) = self.poller.take() {
            handle.stop();
        }
        self.cell.close();
    }

    fn reload(&self) -> Result<bool, ApiError> {
        poll::refresh(self.source.as_ref(), &self.cell)
    }
}

/// Status bar, stats charts and bad-files grid against one backend.
pub struct Dashboard {
    client: Arc<CheckrrClient>,
    status: Mounted<StatusSource>,
    stats: Mounted<StatsSource>,
    files: Mounted<FilesSource>,
}

impl Dashboard {
    /// Build the views without starting any poller.
    pub fn new(client: CheckrrClient) -> Self {
        let client = Arc::new(client);
        Self {
            status: Mounted::new(StatusSource::new(Arc::clone(&client))),
            stats: Mounted::new(StatsSource::new(Arc::clone(&client))),
            files: Mounted::new(FilesSource::new(Arc::clone(&client))),
            client,
        }
    }

    /// Build the views and start one poller per view.
    pub fn mount(client: CheckrrClient, interval: Duration) -> std::io::Result<Self> {
        let mut dashboard = Self::new(client);
        dashboard.status.start(interval)?;
        dashboard.stats.start(interval)?;
        dashboard.files.start(interval)?;
        tracing::debug!(base_url = %dashboard.client.base_url(), "dashboard mounted");
        Ok(dashboard)
    }

    /// Stop every poller and discard anything still in flight.
    pub fn unmount(&mut self) {
        self.status.stop();
        self.stats.stop();
        self.files.stop();
        tracing::debug!("dashboard unmounted");
    }

    pub fn client(&self) -> &CheckrrClient {
        &self.client
    }

    // -- Snapshots --

    pub fn status(&self) -> Option<StatusBar> {
        self.status.cell.snapshot()
    }

    pub fn stats(&self) -> Option<StatsModel> {
        self.stats.cell.snapshot()
    }

    pub fn files(&self) -> Option<Vec<BadFileRow>> {
        self.files.cell.snapshot()
    }

    // -- Manual reloads --

    pub fn reload_status(&self) -> Result<bool, ApiError> {
        self.status.reload()
    }

    pub fn reload_stats(&self) -> Result<bool, ApiError> {
        self.stats.reload()
    }

    pub fn reload_files(&self) -> Result<bool, ApiError> {
        self.files.reload()
    }

    /// Reload all three views, reporting the first failure after trying all.
    pub fn reload_all(&self) -> Result<(), ApiError> {
        let status = self.reload_status();
        let stats = self.reload_stats();
        let files = self.reload_files();
        status.and(stats).and(files).map(|_| ())
    }

    // -- Actions --

    /// Ask the backend to start a run now.
    ///
    /// The status bar flips to running before the request is sent; the next
    /// status poll confirms or corrects it. Before the first status fetch the
    /// bar starts from the idle state (no schedule, no last run).
    pub fn run_now(&self) -> Result<(), DashError> {
        if self.status().is_some_and(|s| s.running) {
            return Err(DashError::AlreadyRunning);
        }
        self.status.cell.upsert(
            || normalize::status_bar(RunStatus::default(), None, Utc::now()),
            StatusBar::mark_running,
        );
        self.client.trigger_run()?;
        tracing::info!("run requested");
        Ok(())
    }

    /// Forget the bad-file records with the given grid ids, then reload the
    /// grid.
    ///
    /// Ids are resolved against the rows currently shown (fetched first if
    /// the grid is still empty). Duplicates collapse; an empty selection is
    /// a no-op. Returns the number of records the backend was asked to drop.
    /// Once the backend accepted the delete, a failed reload is only logged;
    /// the next poll brings the grid back in sync.
    pub fn delete_selected(&self, ids: &[usize]) -> Result<usize, DashError> {
        let selected: BTreeSet<usize> = ids.iter().copied().collect();
        if selected.is_empty() {
            return Ok(0);
        }

        if self.files().is_none() {
            self.reload_files()?;
        }
        let known = self.files().map_or(0, |rows| rows.len());
        let unknown: Vec<usize> = selected
            .iter()
            .copied()
            .filter(|&id| id == 0 || id > known)
            .collect();
        if !unknown.is_empty() {
            return Err(DashError::InvalidSelection { ids: unknown });
        }

        let selected: Vec<usize> = selected.into_iter().collect();
        self.client.delete_bad_files(&selected)?;
        tracing::info!(count = selected.len(), "bad-file records deleted");

        if let Err(e) = self.reload_files() {
            tracing::warn!(error = %e, "bad-file reload after delete failed");
        }
        Ok(selected.len())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}
