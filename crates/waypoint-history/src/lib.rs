//! Waypoint History - Application Stacks in the Navigation Log
//!
//! Keeps an ordered stack of application values in sync with the host's
//! back/forward log. Every push adds a log entry, the back button pops, and
//! `drop_top` removes the top value so that forward navigation can never
//! reach it again.
//!
//! # Architecture
//!
//! - [`machine`]: pure `transition(state, event) -> (state, commands)`
//! - [`HistoryController`]: runtime that feeds host events into the machine
//!   and executes the commands it returns
//!
//! ```rust
//! use waypoint_core::HistoryConfig;
//! use waypoint_effects::MemoryHistoryHandler;
//! use waypoint_history::HistoryController;
//!
//! let log = MemoryHistoryHandler::new();
//! let history = HistoryController::new(log.clone(), HistoryConfig::default()).unwrap();
//!
//! history.push("alpha");
//! history.push("beta");
//! history.pop();
//! log.settle();
//!
//! assert_eq!(history.get_current_stack().as_slice(), &["alpha"]);
//! ```

#![forbid(unsafe_code)]

/// Controller runtime
pub mod controller;

/// Construction errors
pub mod error;

/// Pure stack synchronization state machine
pub mod machine;

pub use controller::{DropHandle, HistoryController, StackListener, StackSubscription};
pub use error::HistoryError;
pub use machine::{DropId, DropOutcome};
