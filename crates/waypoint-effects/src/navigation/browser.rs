//! Navigation handler over the browser's `window.history`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use waypoint_core::{EntryState, NavigationEffects, NavigationError, NavigationListener};

/// `window.history` and `popstate` as a navigation log.
///
/// Entry states cross the JS boundary as JSON. A state the page did not
/// write (or wrote in another shape) reads back as an empty, regular entry.
pub struct BrowserHistoryHandler<T> {
    subscribed: AtomicBool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for BrowserHistoryHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BrowserHistoryHandler<T> {
    /// Create a handler for the current window
    pub fn new() -> Self {
        Self {
            subscribed: AtomicBool::new(false),
            _marker: PhantomData,
        }
    }
}

fn window() -> Result<web_sys::Window, NavigationError> {
    web_sys::window().ok_or_else(|| NavigationError::Unavailable {
        reason: "no global window".to_string(),
    })
}

fn history() -> Result<web_sys::History, NavigationError> {
    window()?
        .history()
        .map_err(|e| NavigationError::Unavailable {
            reason: format!("{e:?}"),
        })
}

fn rejected(e: JsValue) -> NavigationError {
    NavigationError::Rejected {
        reason: format!("{e:?}"),
    }
}

fn encode<T: Serialize>(state: &EntryState<T>) -> Result<JsValue, NavigationError> {
    let text = serde_json::to_string(state).map_err(|e| NavigationError::Encode {
        reason: e.to_string(),
    })?;
    js_sys::JSON::parse(&text).map_err(|e| NavigationError::Encode {
        reason: format!("{e:?}"),
    })
}

fn decode<T: DeserializeOwned>(value: JsValue) -> Option<EntryState<T>> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let text: Option<String> = js_sys::JSON::stringify(&value).ok().map(Into::into);
    let decoded = text.and_then(|text| serde_json::from_str(&text).ok());
    if decoded.is_none() {
        tracing::warn!("unreadable history state, treating as empty stack");
    }
    Some(decoded.unwrap_or_default())
}

impl<T> NavigationEffects<T> for BrowserHistoryHandler<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn current_entry(&self) -> Option<EntryState<T>> {
        match history().and_then(|h| h.state().map_err(rejected)) {
            Ok(value) => decode(value),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read history state");
                None
            }
        }
    }

    fn current_url(&self) -> String {
        window()
            .ok()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    fn push_entry(&self, state: EntryState<T>, url: &str) -> Result<(), NavigationError> {
        let value = encode(&state)?;
        history()?
            .push_state_with_url(&value, "", Some(url))
            .map_err(rejected)
    }

    fn replace_entry(&self, state: EntryState<T>, url: &str) -> Result<(), NavigationError> {
        let value = encode(&state)?;
        history()?
            .replace_state_with_url(&value, "", Some(url))
            .map_err(rejected)
    }

    fn go_back(&self) -> Result<(), NavigationError> {
        history()?.back().map_err(rejected)
    }

    fn go_forward(&self) -> Result<(), NavigationError> {
        history()?.forward().map_err(rejected)
    }

    fn on_navigate(&self, listener: NavigationListener<T>) -> Result<(), NavigationError> {
        let window = window()?;
        if self.subscribed.swap(true, Ordering::SeqCst) {
            return Err(NavigationError::AlreadySubscribed);
        }

        let onpopstate: Closure<dyn Fn(web_sys::PopStateEvent)> =
            Closure::new(move |event: web_sys::PopStateEvent| {
                listener(decode(event.state()));
            });
        let registered = window
            .add_event_listener_with_callback("popstate", onpopstate.as_ref().unchecked_ref())
            .map_err(rejected);

        if registered.is_err() {
            self.subscribed.store(false, Ordering::SeqCst);
        }
        onpopstate.forget();
        registered
    }
}
