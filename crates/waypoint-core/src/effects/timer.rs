//! Timer effect interface.

use std::sync::Arc;
use std::time::Duration;

/// A delayed unit of work.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Error type for timer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// Scheduling was attempted outside an async runtime.
    #[error("no async runtime available to schedule timers")]
    NoRuntime,
    /// The host refused the timer.
    #[error("failed to schedule timer: {reason}")]
    ScheduleFailed {
        /// Host message
        reason: String,
    },
}

/// Fire-and-forget scheduling of delayed tasks.
///
/// Scheduled tasks cannot be cancelled; callers that need to ignore a task
/// that became irrelevant must check for that when it runs.
pub trait TimerEffects: Send + Sync {
    /// Run `task` once, no earlier than `after` from now.
    fn schedule(&self, after: Duration, task: TimerTask) -> Result<(), TimerError>;
}

/// Blanket implementation for Arc<H> where H: TimerEffects
impl<H: TimerEffects + ?Sized> TimerEffects for Arc<H> {
    fn schedule(&self, after: Duration, task: TimerTask) -> Result<(), TimerError> {
        (**self).schedule(after, task)
    }
}
