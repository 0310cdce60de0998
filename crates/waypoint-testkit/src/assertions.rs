//! Standard assertion helpers for tests

use crate::fixtures::HistoryFixture;
use std::fmt::Debug;
use waypoint_core::EntryState;

/// Assert the steady-state invariant: nothing is in flight, and the log's
/// active entry is regular and holds exactly the controller's stack.
pub fn assert_settled<T>(fixture: &HistoryFixture<T>)
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    assert_eq!(
        fixture.log().pending_traversals(),
        0,
        "navigation log still has queued traversals"
    );
    assert!(
        fixture.controller().is_settled(),
        "controller still has work in flight"
    );

    let active = EntryState::normalize(fixture.log().active_entry().state);
    assert!(
        !active.is_transient,
        "settled on a transient entry {:?}",
        active.stack
    );
    assert_eq!(
        active.stack,
        fixture.controller().get_current_stack(),
        "log and controller disagree about the stack"
    );
    assert!(
        fixture
            .controller()
            .current_entry()
            .map_or(true, |entry| !entry.is_transient),
        "controller caches a transient entry"
    );
}

/// Assert the controller's stack.
pub fn assert_stack<T>(fixture: &HistoryFixture<T>, expected: &[T])
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    assert_eq!(fixture.stack().as_slice(), expected);
}

/// Assert that no log entry at or after `index` still holds `value` on top.
pub fn assert_unreachable_forward<T>(fixture: &HistoryFixture<T>, index: usize, value: &T)
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    for (position, entry) in fixture.log().entries().iter().enumerate().skip(index) {
        let top = entry.state.as_ref().and_then(|state| state.stack.last());
        assert_ne!(
            top,
            Some(value),
            "entry {position} still exposes {value:?} on top"
        );
    }
}
