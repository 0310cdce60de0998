//! Timer handler over `window.setTimeout`.

use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use waypoint_core::{TimerEffects, TimerError, TimerTask};

/// Schedules tasks with the browser's `setTimeout`.
#[derive(Debug, Clone, Default)]
pub struct BrowserTimerHandler;

impl BrowserTimerHandler {
    /// Create a new browser timer handler
    pub fn new() -> Self {
        Self
    }
}

impl TimerEffects for BrowserTimerHandler {
    fn schedule(&self, after: Duration, task: TimerTask) -> Result<(), TimerError> {
        let window = web_sys::window().ok_or_else(|| TimerError::ScheduleFailed {
            reason: "no global window".to_string(),
        })?;
        let millis = i32::try_from(after.as_millis()).unwrap_or(i32::MAX);
        let callback = Closure::once_into_js(move || task());

        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis,
            )
            .map(|_| ())
            .map_err(|e| TimerError::ScheduleFailed {
                reason: format!("{e:?}"),
            })
    }
}
