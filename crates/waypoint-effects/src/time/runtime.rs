//! Timer handler backed by the tokio runtime.

use std::time::Duration;
use tokio::runtime::Handle;
use waypoint_core::{TimerEffects, TimerError, TimerTask};

/// Schedules tasks on the tokio runtime that is current at the time of the
/// call.
///
/// Time follows `tokio::time`, so a paused test runtime controls when tasks
/// fire.
#[derive(Debug, Clone, Default)]
pub struct TokioTimerHandler;

impl TokioTimerHandler {
    /// Create a new tokio timer handler
    pub fn new() -> Self {
        Self
    }
}

impl TimerEffects for TokioTimerHandler {
    fn schedule(&self, after: Duration, task: TimerTask) -> Result<(), TimerError> {
        let handle = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        handle.spawn(async move {
            tokio::time::sleep(after).await;
            task();
        });
        Ok(())
    }
}
