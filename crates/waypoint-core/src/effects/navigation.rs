//! Navigation effect interface.
//!
//! Models the host's back/forward log (a browser's `window.history`, or an
//! in-memory equivalent). The log is a black box: the user can move through
//! it at any time, traversals complete asynchronously, and the only feedback
//! is a navigation notification delivered after the fact.

use crate::entry::EntryState;
use std::sync::Arc;

/// Callback invoked once per completed navigation with the newly active
/// entry's state. `None` means the entry carries no state at all.
pub type NavigationListener<T> = Arc<dyn Fn(Option<EntryState<T>>) + Send + Sync>;

/// Error type for navigation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// The host has no navigation log to operate on.
    #[error("navigation log unavailable: {reason}")]
    Unavailable {
        /// What was missing
        reason: String,
    },
    /// Entry state could not be converted to the host's representation.
    #[error("failed to encode entry state: {reason}")]
    Encode {
        /// Encoder message
        reason: String,
    },
    /// The host refused a push, replace or traversal.
    #[error("host rejected navigation command: {reason}")]
    Rejected {
        /// Host message
        reason: String,
    },
    /// `on_navigate` was called on a handler that already has a listener.
    #[error("a navigation listener is already installed")]
    AlreadySubscribed,
}

/// The host's back/forward navigation log.
///
/// `go_back` and `go_forward` are requests: they return before the traversal
/// has happened. Each traversal that actually moves produces exactly one
/// notification to the installed listener; a traversal past either end of
/// the log produces none. `push_entry` and `replace_entry` take effect
/// immediately and never notify.
pub trait NavigationEffects<T>: Send + Sync {
    /// State of the currently active entry.
    fn current_entry(&self) -> Option<EntryState<T>>;

    /// URL of the currently active entry.
    fn current_url(&self) -> String;

    /// Add an entry after the active one, discarding any forward entries.
    fn push_entry(&self, state: EntryState<T>, url: &str) -> Result<(), NavigationError>;

    /// Overwrite the active entry in place.
    fn replace_entry(&self, state: EntryState<T>, url: &str) -> Result<(), NavigationError>;

    /// Request a traversal one entry back.
    fn go_back(&self) -> Result<(), NavigationError>;

    /// Request a traversal one entry forward.
    fn go_forward(&self) -> Result<(), NavigationError>;

    /// Install the navigation listener. A handler accepts exactly one.
    fn on_navigate(&self, listener: NavigationListener<T>) -> Result<(), NavigationError>;
}

/// Blanket implementation for Arc<H> where H: NavigationEffects
impl<T, H: NavigationEffects<T> + ?Sized> NavigationEffects<T> for Arc<H> {
    fn current_entry(&self) -> Option<EntryState<T>> {
        (**self).current_entry()
    }

    fn current_url(&self) -> String {
        (**self).current_url()
    }

    fn push_entry(&self, state: EntryState<T>, url: &str) -> Result<(), NavigationError> {
        (**self).push_entry(state, url)
    }

    fn replace_entry(&self, state: EntryState<T>, url: &str) -> Result<(), NavigationError> {
        (**self).replace_entry(state, url)
    }

    fn go_back(&self) -> Result<(), NavigationError> {
        (**self).go_back()
    }

    fn go_forward(&self) -> Result<(), NavigationError> {
        (**self).go_forward()
    }

    fn on_navigate(&self, listener: NavigationListener<T>) -> Result<(), NavigationError> {
        (**self).on_navigate(listener)
    }
}
