#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]
//! # Controller Scenarios
//!
//! End-to-end behavior of the history controller over the in-memory
//! navigation log, with traversals delivered explicitly so every test
//! decides when the host's navigation events arrive.

use parking_lot::Mutex;
use std::sync::Arc;
use waypoint_core::{
    ConfigError, DropConfig, DropSequencing, EntryState, HistoryConfig, List, NavigationEffects,
    NavigationError, NavigationListener,
};
use waypoint_effects::MemoryHistoryHandler;
use waypoint_history::{DropOutcome, HistoryController, HistoryError};
use waypoint_testkit::*;

fn fixture_with(values: &[&'static str]) -> HistoryFixture<&'static str> {
    let fixture = HistoryFixture::new();
    for value in values {
        fixture.push(*value);
    }
    fixture.settle();
    fixture
}

#[test]
fn test_push_grows_stack() {
    let fixture = HistoryFixture::new();
    fixture.push("alpha");
    fixture.push("beta");

    assert_stack(&fixture, &["alpha", "beta"]);
    assert_eq!(fixture.log().len(), 3);
    assert_settled(&fixture);
    assert_eq!(
        fixture.recorder().snapshots(),
        vec![List::from(["alpha"]), List::from(["alpha", "beta"])]
    );
}

#[test]
fn test_pop_settles_on_previous_stack() {
    let fixture = fixture_with(&["alpha", "beta"]);
    fixture.pop();
    fixture.settle();

    assert_stack(&fixture, &["alpha"]);
    assert_settled(&fixture);
}

#[test]
fn test_pop_reports_optimistic_read_before_navigation_lands() {
    let fixture = fixture_with(&["alpha", "beta"]);
    fixture.recorder().clear();

    fixture.pop();
    assert_eq!(fixture.log().pending_traversals(), 1);
    assert_eq!(
        fixture.recorder().last(),
        Some(List::from(["alpha", "beta"]))
    );

    fixture.settle();
    assert_eq!(fixture.recorder().last(), Some(List::from(["alpha"])));
}

#[test]
fn test_pop_to_stateless_entry_is_empty() {
    let fixture = fixture_with(&["alpha"]);
    fixture.pop();
    fixture.settle();

    assert!(fixture.stack().is_empty());
    assert_eq!(fixture.controller().current_entry(), None);
    assert_settled(&fixture);
}

#[test]
fn test_pop_on_empty_stack_is_harmless() {
    let fixture: HistoryFixture<&str> = HistoryFixture::new();
    fixture.pop();
    fixture.settle();

    assert!(fixture.stack().is_empty());
    assert_settled(&fixture);
}

#[test]
fn test_drop_removes_top_and_hides_it() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    let mut handle = fixture.drop_top();
    fixture.settle();

    assert_eq!(handle.try_outcome(), Some(DropOutcome::Completed));
    assert_stack(&fixture, &["alpha", "beta"]);
    assert_settled(&fixture);
    assert_unreachable_forward(&fixture, 0, &"gamma");

    let entries = fixture.log().entries();
    assert_eq!(entries.len(), 4);
    assert_eq!(
        entries[2].state,
        Some(EntryState::transient(["alpha", "beta"]))
    );
    assert_eq!(entries[3].state, Some(EntryState::new(["alpha", "beta"])));
}

#[test]
fn test_pop_after_drop_skips_waypoint() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    fixture.drop_top();
    fixture.settle();
    fixture.recorder().clear();

    fixture.pop();
    fixture.settle();

    assert_stack(&fixture, &["alpha"]);
    assert_settled(&fixture);
    for stack in fixture.recorder().snapshots() {
        assert!(!stack.contains(&"gamma"));
    }
}

#[test]
fn test_forward_after_drop_skips_waypoint() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    fixture.drop_top();
    fixture.settle();
    fixture.pop();
    fixture.settle();

    fixture.user_forward();
    fixture.settle();
    assert_stack(&fixture, &["alpha", "beta"]);
    assert_settled(&fixture);

    fixture.user_forward();
    fixture.settle();
    assert_stack(&fixture, &["alpha", "beta"]);
}

#[test]
fn test_user_back_over_waypoint_reaches_stateless_entry() {
    let fixture = fixture_with(&["alpha", "beta"]);
    fixture.drop_top();
    fixture.settle();
    assert_stack(&fixture, &["alpha"]);

    fixture.user_back();
    fixture.settle();
    assert!(fixture.stack().is_empty());
    assert_settled(&fixture);

    fixture.user_forward();
    fixture.settle();
    assert_stack(&fixture, &["alpha"]);
    assert_settled(&fixture);
}

#[test]
fn test_repeated_drops_chain_waypoints() {
    let fixture = fixture_with(&["alpha", "beta", "gamma", "delta"]);
    fixture.drop_top();
    fixture.settle();
    fixture.drop_top();
    fixture.settle();

    assert_stack(&fixture, &["alpha", "beta"]);
    assert_settled(&fixture);

    fixture.pop();
    fixture.settle();
    assert_stack(&fixture, &["alpha"]);
    assert_settled(&fixture);
}

#[test]
fn test_push_supersedes_pending_drop() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    let mut handle = fixture.drop_top();
    fixture.push("delta");

    assert_eq!(handle.try_outcome(), Some(DropOutcome::Superseded));

    // The drop's back navigation still lands afterwards.
    fixture.settle();
    assert_stack(&fixture, &["alpha", "beta", "gamma"]);
    assert_settled(&fixture);
}

#[test]
fn test_second_drop_supersedes_first() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    let mut first = fixture.drop_top();
    let mut second = fixture.drop_top();

    assert_eq!(first.try_outcome(), Some(DropOutcome::Superseded));
    assert_eq!(second.try_outcome(), None);
    assert_ne!(first.id(), second.id());

    fixture.settle();
    assert_eq!(second.try_outcome(), Some(DropOutcome::Completed));
    assert_settled(&fixture);
}

#[test]
fn test_drop_outcome_is_kept_after_first_read() {
    let fixture = fixture_with(&["alpha", "beta"]);
    let mut handle = fixture.drop_top();
    fixture.settle();

    assert_eq!(handle.try_outcome(), Some(DropOutcome::Completed));
    assert_eq!(handle.try_outcome(), Some(DropOutcome::Completed));
}

#[test]
fn test_drop_at_start_of_log_waits_for_next_operation() {
    let fixture = HistoryFixture::with_initial_entry(EntryState::new(["home"]));
    let mut handle = fixture.drop_top();
    fixture.settle();

    // Nothing lies behind the first entry, so no navigation is reported.
    assert_eq!(handle.try_outcome(), None);
    assert_stack(&fixture, &["home"]);
    assert!(!fixture.controller().is_settled());

    fixture.push("next");
    fixture.settle();
    assert_eq!(handle.try_outcome(), Some(DropOutcome::Superseded));
    assert_stack(&fixture, &["home", "next"]);
    assert_settled(&fixture);
}

#[test]
fn test_forward_gesture_does_not_complete_stuck_drop() {
    let fixture = HistoryFixture::with_initial_entry(EntryState::new(["home"]));
    fixture.push("detail");
    fixture.pop();
    fixture.settle();
    assert_stack(&fixture, &["home"]);

    let mut handle = fixture.drop_top();
    fixture.settle();
    fixture.user_forward();
    fixture.settle();

    assert_eq!(handle.try_outcome(), Some(DropOutcome::Abandoned));
    assert_stack(&fixture, &["home", "detail"]);
    assert_settled(&fixture);
    assert_eq!(
        fixture.log().entries()[1].state,
        Some(EntryState::new(["home", "detail"]))
    );
}

#[test]
fn test_drop_on_empty_stack_is_harmless() {
    let fixture: HistoryFixture<&str> = HistoryFixture::new();
    let mut handle = fixture.drop_top();
    fixture.settle();

    assert_eq!(handle.try_outcome(), None);
    assert!(fixture.stack().is_empty());
    assert_eq!(fixture.log().len(), 1);

    fixture.push("alpha");
    fixture.settle();
    assert_eq!(handle.try_outcome(), Some(DropOutcome::Superseded));
    assert_stack(&fixture, &["alpha"]);
    assert_settled(&fixture);
}

#[test]
fn test_drop_to_empty_stack_overwrites_stateless_entry() {
    let fixture = fixture_with(&["alpha"]);
    let mut handle = fixture.drop_top();
    fixture.settle();

    assert_eq!(handle.try_outcome(), Some(DropOutcome::Completed));
    assert!(fixture.stack().is_empty());
    assert_settled(&fixture);
    assert_unreachable_forward(&fixture, 0, &"alpha");
    assert_eq!(
        fixture.log().entries()[0].state,
        Some(EntryState::transient(Vec::<&str>::new()))
    );
}

#[test]
fn test_user_back_before_drop_navigation_lands() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    fixture.user_back();
    let mut handle = fixture.drop_top();
    fixture.settle();

    // The gesture lands first and counts as the drop's landing; the drop's
    // own back navigation then moves past the new waypoint.
    assert_eq!(handle.try_outcome(), Some(DropOutcome::Completed));
    assert_stack(&fixture, &["alpha"]);
    assert_settled(&fixture);
    assert_unreachable_forward(&fixture, 0, &"gamma");
}

#[test]
fn test_user_forward_before_drop_navigation_lands() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    fixture.pop();
    fixture.settle();

    fixture.user_forward();
    let mut handle = fixture.drop_top();
    assert!(fixture.log().deliver_next());
    assert_eq!(handle.try_outcome(), Some(DropOutcome::Abandoned));
    assert_stack(&fixture, &["alpha", "beta", "gamma"]);

    fixture.settle();
    assert_stack(&fixture, &["alpha", "beta"]);
    assert_settled(&fixture);
    assert!(fixture
        .log()
        .entries()
        .iter()
        .all(|entry| entry.state.as_ref().map_or(true, |s| !s.is_transient)));
}

#[test]
fn test_unsubscribe_removes_only_that_listener() {
    let fixture: HistoryFixture<&str> = HistoryFixture::new();
    let (kept, _kept_subscription) = StackRecorder::attach(fixture.controller());
    let (removed, subscription) = StackRecorder::attach(fixture.controller());

    fixture.push("alpha");
    subscription.unsubscribe();
    fixture.push("beta");

    assert_eq!(kept.len(), 2);
    assert_eq!(removed.snapshots(), vec![List::from(["alpha"])]);
    assert_eq!(fixture.recorder().len(), 2);
}

#[test]
fn test_listener_may_push_reentrantly() {
    let log = MemoryHistoryHandler::new();
    let controller = HistoryController::new(log.clone(), HistoryConfig::default()).unwrap();

    let inner = controller.clone();
    controller.subscribe_to_stack_change(move |stack: &List<&'static str>| {
        if stack.as_slice() == ["alpha"] {
            inner.push("beta");
        }
    });

    controller.push("alpha");

    assert_eq!(controller.get_current_stack(), List::from(["alpha", "beta"]));
    let stacks: Vec<_> = log
        .entries()
        .into_iter()
        .map(|entry| EntryState::normalize(entry.state).stack)
        .collect();
    assert_eq!(
        stacks,
        vec![
            List::new(),
            List::from(["alpha"]),
            List::from(["alpha", "beta"])
        ]
    );
}

#[test]
fn test_push_with_url_and_drop_keeps_url() {
    let log = MemoryHistoryHandler::new();
    let controller = HistoryController::new(log.clone(), HistoryConfig::default()).unwrap();

    controller.push_with_url("alpha", "app://waypoint/alpha");
    controller.push_with_url("beta", "app://waypoint/beta");
    assert_eq!(log.current_url(), "app://waypoint/beta");

    controller.drop_top();
    log.settle();

    assert_eq!(log.current_url(), "app://waypoint/alpha");
    assert_eq!(log.entries()[1].url, "app://waypoint/alpha");
}

#[test]
fn test_attaches_to_existing_entry() {
    let fixture = HistoryFixture::with_initial_entry(EntryState::new(["home"]));
    assert_stack(&fixture, &["home"]);

    fixture.push("detail");
    fixture.pop();
    fixture.settle();
    assert_stack(&fixture, &["home"]);
    assert_settled(&fixture);
}

#[test]
fn test_fixed_delay_requires_timers() {
    let config = HistoryConfig {
        drop: DropConfig {
            sequencing: DropSequencing::FixedDelay,
            ..DropConfig::default()
        },
        ..HistoryConfig::default()
    };
    let result = HistoryController::new(MemoryHistoryHandler::<u8>::new(), config);
    assert!(matches!(result, Err(HistoryError::MissingTimers)));
}

#[test]
fn test_invalid_config_rejected() {
    let config = HistoryConfig {
        max_corrective_hops: 0,
        ..HistoryConfig::default()
    };
    let result = HistoryController::new(MemoryHistoryHandler::<u8>::new(), config);
    assert!(matches!(
        result,
        Err(HistoryError::Config(ConfigError::Invalid { .. }))
    ));
}

#[test]
fn test_second_controller_on_same_log_rejected() {
    let log = MemoryHistoryHandler::<u8>::new();
    let _first = HistoryController::new(log.clone(), HistoryConfig::default()).unwrap();
    let second = HistoryController::new(log, HistoryConfig::default());
    assert!(matches!(
        second,
        Err(HistoryError::Navigation(NavigationError::AlreadySubscribed))
    ));
}

/// Log whose `push_entry` always fails.
struct RejectingLog {
    inner: MemoryHistoryHandler<&'static str>,
    rejected: Arc<Mutex<usize>>,
}

impl NavigationEffects<&'static str> for RejectingLog {
    fn current_entry(&self) -> Option<EntryState<&'static str>> {
        self.inner.current_entry()
    }

    fn current_url(&self) -> String {
        self.inner.current_url()
    }

    fn push_entry(
        &self,
        _state: EntryState<&'static str>,
        _url: &str,
    ) -> Result<(), NavigationError> {
        *self.rejected.lock() += 1;
        Err(NavigationError::Rejected {
            reason: "quota exceeded".to_string(),
        })
    }

    fn replace_entry(
        &self,
        state: EntryState<&'static str>,
        url: &str,
    ) -> Result<(), NavigationError> {
        self.inner.replace_entry(state, url)
    }

    fn go_back(&self) -> Result<(), NavigationError> {
        self.inner.go_back()
    }

    fn go_forward(&self) -> Result<(), NavigationError> {
        self.inner.go_forward()
    }

    fn on_navigate(
        &self,
        listener: NavigationListener<&'static str>,
    ) -> Result<(), NavigationError> {
        self.inner.on_navigate(listener)
    }
}

#[test]
fn test_navigation_failures_do_not_propagate() {
    let rejected = Arc::new(Mutex::new(0));
    let log = RejectingLog {
        inner: MemoryHistoryHandler::new(),
        rejected: rejected.clone(),
    };
    let controller = HistoryController::new(log, HistoryConfig::default()).unwrap();

    controller.push("alpha");

    assert_eq!(*rejected.lock(), 1);
    assert_eq!(controller.get_current_stack(), List::from(["alpha"]));
}

#[tokio::test]
async fn test_watch_stack_follows_notifications() {
    let fixture = HistoryFixture::new();
    let mut stacks = fixture.controller().watch_stack();
    assert!(stacks.borrow().is_empty());

    fixture.push("alpha");
    stacks.changed().await.unwrap();
    assert_eq!(*stacks.borrow_and_update(), List::from(["alpha"]));

    fixture.push("beta");
    fixture.pop();
    fixture.settle();
    stacks.changed().await.unwrap();
    assert_eq!(*stacks.borrow(), List::from(["alpha"]));
}

#[tokio::test]
async fn test_drop_handle_resolves() {
    let fixture = fixture_with(&["alpha", "beta"]);
    let handle = fixture.drop_top();
    fixture.settle();
    assert_eq!(handle.wait().await, DropOutcome::Completed);
}

#[tokio::test]
async fn test_drop_handle_abandoned_when_controller_dropped() {
    let log = MemoryHistoryHandler::new();
    let controller = HistoryController::new(log.clone(), HistoryConfig::default()).unwrap();
    controller.push("alpha");
    controller.push("beta");

    let handle = controller.drop_top();
    drop(controller);
    log.settle();

    assert_eq!(handle.wait().await, DropOutcome::Abandoned);
}
