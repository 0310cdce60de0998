//! History events
//!
//! Inputs to the state machine: the public operations plus everything the
//! host and the timers report back.

use std::fmt;
use waypoint_core::EntryState;

/// Identifier of one `drop_top` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropId(pub u64);

impl fmt::Display for DropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drop-{}", self.0)
    }
}

/// Timed steps of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayedStep {
    /// Overwrite the entry the back navigation landed on with a transient waypoint
    WriteWaypoint,
    /// Push the final, reduced stack
    PushFinal,
    /// The back navigation of an event-confirmed drop should have landed by now
    LandingDeadline,
}

/// Event consumed by [`transition`](super::transition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent<T> {
    /// Application pushed a value
    Push {
        /// Value to append
        value: T,
        /// URL of the new entry; `None` keeps the active one
        url: Option<String>,
    },
    /// Application popped the top value
    Pop,
    /// Application dropped the top value
    Drop {
        /// Identifier handed back to the caller
        drop: DropId,
    },
    /// Host reported a completed navigation
    Navigated(Option<EntryState<T>>),
    /// Result of an immediate read of the active entry
    ActiveEntryRead(Option<EntryState<T>>),
    /// A drop timer fired
    DelayElapsed {
        /// Drop that scheduled the timer
        drop: DropId,
        /// Step to run
        step: DelayedStep,
    },
}

impl<T> HistoryEvent<T> {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::Pop => "pop",
            Self::Drop { .. } => "drop",
            Self::Navigated(_) => "navigated",
            Self::ActiveEntryRead(_) => "active-entry-read",
            Self::DelayElapsed { .. } => "delay-elapsed",
        }
    }
}
