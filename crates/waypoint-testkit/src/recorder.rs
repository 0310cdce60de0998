//! Recording stack listeners

use parking_lot::Mutex;
use std::sync::Arc;
use waypoint_core::List;
use waypoint_history::{HistoryController, StackSubscription};

/// Collects every stack a controller announces.
///
/// Cloning yields another handle onto the same recording.
pub struct StackRecorder<T> {
    seen: Arc<Mutex<Vec<List<T>>>>,
}

impl<T> Clone for StackRecorder<T> {
    fn clone(&self) -> Self {
        Self {
            seen: self.seen.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> StackRecorder<T> {
    /// Subscribe a new recorder to `controller`.
    pub fn attach(controller: &HistoryController<T>) -> (Self, StackSubscription<T>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = controller.subscribe_to_stack_change(move |stack: &List<T>| {
            sink.lock().push(stack.clone());
        });
        (Self { seen }, subscription)
    }

    /// Every stack announced so far, oldest first.
    pub fn snapshots(&self) -> Vec<List<T>> {
        self.seen.lock().clone()
    }

    /// The most recent announcement.
    pub fn last(&self) -> Option<List<T>> {
        self.seen.lock().last().cloned()
    }

    /// Number of announcements.
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Whether nothing was announced.
    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}
