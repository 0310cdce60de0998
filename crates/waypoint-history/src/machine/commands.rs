//! History commands
//!
//! Side effects produced by state transitions and executed by the
//! controller runtime, in order.

use super::events::{DelayedStep, DropId};
use std::time::Duration;
use waypoint_core::{EntryState, List};

/// How a `drop_top` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The dropped entry was replaced and the reduced stack pushed
    Completed,
    /// A later push, pop or drop took over before the drop finished
    Superseded,
    /// The drop can no longer finish: the user navigated elsewhere, the hop
    /// budget ran out or the controller is gone
    Abandoned,
}

/// Command representing a side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand<T> {
    /// Call every stack listener with the new stack
    Notify(List<T>),
    /// Push a new entry; `None` keeps the active entry's URL
    PushEntry {
        /// State of the new entry
        state: EntryState<T>,
        /// URL of the new entry
        url: Option<String>,
    },
    /// Overwrite the active entry, keeping its URL
    ReplaceEntry {
        /// Replacement state
        state: EntryState<T>,
    },
    /// Request a traversal one entry back
    GoBack,
    /// Request a traversal one entry forward
    GoForward,
    /// Read the active entry and feed it back as `ActiveEntryRead`
    ReadActiveEntry,
    /// Feed `DelayElapsed` back after `after`
    Schedule {
        /// Drop the timer belongs to
        drop: DropId,
        /// Step to run when it fires
        step: DelayedStep,
        /// Delay from now
        after: Duration,
    },
    /// Complete the handle returned for `drop`
    ResolveDrop {
        /// Drop to resolve
        drop: DropId,
        /// How it ended
        outcome: DropOutcome,
    },
}
