//! Timer handlers.

mod runtime;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod browser;

pub use runtime::TokioTimerHandler;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use browser::BrowserTimerHandler;
