//! Navigation log handlers.

mod memory;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod browser;

pub use memory::{LogEntry, MemoryHistoryHandler, Traversal, DEFAULT_URL, MAX_SETTLE_STEPS};

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use browser::BrowserHistoryHandler;
