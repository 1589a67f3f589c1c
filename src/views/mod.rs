//! The three dashboard views and the user actions they expose.
//!
//! A [`Dashboard`] owns one [`ViewCell`](crate::poll::ViewCell) per view. It
//! can be used unmounted (one-shot reloads from the CLI) or mounted, in
//! which case each view is kept fresh by its own poller until
//! [`Dashboard::unmount`].

mod dashboard;
mod sources;

use thiserror::Error;

use crate::api::ApiError;

pub use dashboard::Dashboard;
pub use sources::{FilesSource, StatsModel, StatsSource, StatusSource};

/// Failure of a dashboard action.
#[derive(Debug, Error)]
pub enum DashError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Ids that do not name a row of the current grid.
    #[error("no bad-file rows with id(s) {ids:?}; reload the list and try again")]
    InvalidSelection { ids: Vec<usize> },

    #[error("a run is already in progress")]
    AlreadyRunning,
}
