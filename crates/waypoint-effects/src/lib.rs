//! Waypoint Effects - Navigation and Timer Handlers
//!
//! Concrete implementations of the effect interfaces declared in
//! `waypoint-core`.
//!
//! - [`MemoryHistoryHandler`]: in-memory navigation log for native and
//!   headless hosts, with explicit delivery of traversal events
//! - [`TokioTimerHandler`]: delayed tasks on the tokio runtime
//! - `BrowserHistoryHandler` / `BrowserTimerHandler` (feature `web`,
//!   wasm32 only): `window.history`, `popstate` and `setTimeout`

#![forbid(unsafe_code)]

/// Navigation log handlers
pub mod navigation;

/// Timer handlers
pub mod time;

pub use navigation::{LogEntry, MemoryHistoryHandler, Traversal, DEFAULT_URL};
pub use time::TokioTimerHandler;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use navigation::BrowserHistoryHandler;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use time::BrowserTimerHandler;
