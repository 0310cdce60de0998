//! In-memory navigation log.
//!
//! Behaves like a browser's session history: pushing discards forward
//! entries, and back/forward traversals are queued and only take effect (and
//! notify) when delivered. Native and headless hosts use it as their
//! navigation log; tests drive delivery explicitly to interleave user
//! gestures with controller commands.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use waypoint_core::{EntryState, NavigationEffects, NavigationError, NavigationListener};

/// URL given to the initial entry when none is supplied.
pub const DEFAULT_URL: &str = "app://waypoint/";

/// Upper bound on deliveries performed by a single [`MemoryHistoryHandler::settle`].
pub const MAX_SETTLE_STEPS: usize = 10_000;

/// One position in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry<T> {
    /// Stored state; `None` for an entry that was never given one
    pub state: Option<EntryState<T>>,
    /// URL of the entry
    pub url: String,
}

/// Direction of a queued traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// One entry towards the start of the log
    Back,
    /// One entry towards the end of the log
    Forward,
}

struct LogState<T> {
    entries: Vec<LogEntry<T>>,
    active: usize,
    pending: VecDeque<Traversal>,
}

/// In-memory navigation log handler.
///
/// Cloning yields another handle onto the same log.
pub struct MemoryHistoryHandler<T> {
    log: Arc<Mutex<LogState<T>>>,
    listener: Arc<Mutex<Option<NavigationListener<T>>>>,
}

impl<T> Clone for MemoryHistoryHandler<T> {
    fn clone(&self) -> Self {
        Self {
            log: self.log.clone(),
            listener: self.listener.clone(),
        }
    }
}

impl<T: Clone> Default for MemoryHistoryHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryHistoryHandler<T> {
    /// A log with a single stateless entry at [`DEFAULT_URL`].
    pub fn new() -> Self {
        Self::with_entry(None, DEFAULT_URL)
    }

    /// A log whose only entry already carries `state`, as after a reload.
    pub fn with_initial_entry(state: EntryState<T>, url: impl Into<String>) -> Self {
        Self::with_entry(Some(state), url)
    }

    fn with_entry(state: Option<EntryState<T>>, url: impl Into<String>) -> Self {
        Self {
            log: Arc::new(Mutex::new(LogState {
                entries: vec![LogEntry {
                    state,
                    url: url.into(),
                }],
                active: 0,
                pending: VecDeque::new(),
            })),
            listener: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue a back traversal as if the user pressed the back button.
    pub fn user_back(&self) {
        self.enqueue(Traversal::Back);
    }

    /// Queue a forward traversal as if the user pressed the forward button.
    pub fn user_forward(&self) {
        self.enqueue(Traversal::Forward);
    }

    fn enqueue(&self, traversal: Traversal) {
        self.log.lock().pending.push_back(traversal);
    }

    /// Apply the oldest queued traversal.
    ///
    /// Returns `false` when nothing was queued. A traversal past either end
    /// of the log is consumed without moving and without notifying.
    pub fn deliver_next(&self) -> bool {
        let landed = {
            let mut log = self.log.lock();
            let Some(traversal) = log.pending.pop_front() else {
                return false;
            };

            let target = match traversal {
                Traversal::Back => log.active.checked_sub(1),
                Traversal::Forward => Some(log.active + 1).filter(|i| *i < log.entries.len()),
            };

            match target {
                Some(index) => {
                    log.active = index;
                    tracing::trace!(?traversal, index, "navigation log traversed");
                    Some(log.entries[index].state.clone())
                }
                None => {
                    tracing::trace!(?traversal, "traversal past end of navigation log ignored");
                    None
                }
            }
        };

        if let Some(state) = landed {
            let listener = self.listener.lock().clone();
            if let Some(listener) = listener {
                listener(state);
            }
        }
        true
    }

    /// Deliver queued traversals until none remain, including traversals
    /// queued by the listener while handling earlier ones.
    ///
    /// Returns the number of traversals consumed.
    pub fn settle(&self) -> usize {
        let mut delivered = 0;
        while delivered < MAX_SETTLE_STEPS && self.deliver_next() {
            delivered += 1;
        }
        if delivered == MAX_SETTLE_STEPS {
            tracing::warn!(delivered, "navigation log did not settle");
        }
        delivered
    }

    /// Snapshot of every entry in the log.
    pub fn entries(&self) -> Vec<LogEntry<T>> {
        self.log.lock().entries.clone()
    }

    /// Index of the active entry.
    pub fn active_index(&self) -> usize {
        self.log.lock().active
    }

    /// Snapshot of the active entry.
    pub fn active_entry(&self) -> LogEntry<T> {
        let log = self.log.lock();
        log.entries[log.active].clone()
    }

    /// Number of entries in the log.
    pub fn len(&self) -> usize {
        self.log.lock().entries.len()
    }

    /// Always false: the log holds at least its initial entry.
    pub fn is_empty(&self) -> bool {
        self.log.lock().entries.is_empty()
    }

    /// Number of queued, undelivered traversals.
    pub fn pending_traversals(&self) -> usize {
        self.log.lock().pending.len()
    }
}

impl<T> NavigationEffects<T> for MemoryHistoryHandler<T>
where
    T: Clone + Send + Sync,
{
    fn current_entry(&self) -> Option<EntryState<T>> {
        let log = self.log.lock();
        log.entries[log.active].state.clone()
    }

    fn current_url(&self) -> String {
        let log = self.log.lock();
        log.entries[log.active].url.clone()
    }

    fn push_entry(&self, state: EntryState<T>, url: &str) -> Result<(), NavigationError> {
        let mut log = self.log.lock();
        let next = log.active + 1;
        log.entries.truncate(next);
        log.entries.push(LogEntry {
            state: Some(state),
            url: url.to_string(),
        });
        log.active = next;
        Ok(())
    }

    fn replace_entry(&self, state: EntryState<T>, url: &str) -> Result<(), NavigationError> {
        let mut log = self.log.lock();
        let active = log.active;
        log.entries[active] = LogEntry {
            state: Some(state),
            url: url.to_string(),
        };
        Ok(())
    }

    fn go_back(&self) -> Result<(), NavigationError> {
        self.enqueue(Traversal::Back);
        Ok(())
    }

    fn go_forward(&self) -> Result<(), NavigationError> {
        self.enqueue(Traversal::Forward);
        Ok(())
    }

    fn on_navigate(&self, listener: NavigationListener<T>) -> Result<(), NavigationError> {
        let mut slot = self.listener.lock();
        if slot.is_some() {
            return Err(NavigationError::AlreadySubscribed);
        }
        *slot = Some(listener);
        Ok(())
    }
}
