//! Controller construction errors.

use waypoint_core::{ConfigError, NavigationError};

/// Errors raised while attaching a [`HistoryController`](crate::HistoryController).
///
/// Once attached, the controller never fails: navigation command errors are
/// logged and the next navigation event resynchronizes it.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to attach to navigation log: {0}")]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("fixed-delay drop sequencing requires a timer handler")]
    MissingTimers,
}
