#![allow(missing_docs, clippy::unwrap_used)]
//! # Fixed-Delay Drop Sequencing
//!
//! Drops that write their waypoint and final entry on timers instead of
//! waiting for the host's navigation event, and the deadline timers bound
//! event-confirmed drops. Time is paused, so the delays elapse exactly when
//! the tests sleep past them.

use std::time::Duration;
use waypoint_core::{EntryState, HistoryConfig, List};
use waypoint_effects::{MemoryHistoryHandler, DEFAULT_URL};
use waypoint_history::DropOutcome;
use waypoint_testkit::*;

fn fixture_with(values: &[&'static str]) -> HistoryFixture<&'static str> {
    let fixture = HistoryFixture::with_fixed_delay();
    for value in values {
        fixture.push(*value);
    }
    fixture.settle();
    fixture
}

#[tokio::test(start_paused = true)]
async fn test_drop_completes_after_both_delays() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    let handle = fixture.drop_top();
    fixture.settle();

    // The back navigation is reported as it lands.
    assert_stack(&fixture, &["alpha", "beta"]);
    assert!(!fixture.controller().is_settled());

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(
        fixture.controller().current_entry(),
        Some(EntryState::transient(["alpha", "beta"]))
    );
    assert_eq!(fixture.log().entries().len(), 4);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.wait().await, DropOutcome::Completed);
    assert_stack(&fixture, &["alpha", "beta"]);
    assert_settled(&fixture);
    assert_unreachable_forward(&fixture, 0, &"gamma");
    assert_eq!(
        fixture.recorder().last(),
        Some(List::from(["alpha", "beta"]))
    );
}

#[tokio::test(start_paused = true)]
async fn test_pop_after_fixed_delay_drop() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    fixture.drop_top();
    fixture.settle();
    tokio::time::sleep(Duration::from_millis(150)).await;

    fixture.pop();
    fixture.settle();
    assert_stack(&fixture, &["alpha"]);
    assert_settled(&fixture);
}

#[tokio::test(start_paused = true)]
async fn test_push_before_timers_fire_wins() {
    let fixture = fixture_with(&["alpha", "beta", "gamma"]);
    let handle = fixture.drop_top();
    fixture.push("delta");
    fixture.settle();

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(handle.wait().await, DropOutcome::Superseded);
    assert_stack(&fixture, &["alpha", "beta", "gamma"]);
    assert_settled(&fixture);
    assert!(fixture
        .log()
        .entries()
        .iter()
        .all(|entry| entry.state.as_ref().map_or(true, |s| !s.is_transient)));
}

#[tokio::test(start_paused = true)]
async fn test_drop_at_start_of_log_completes_at_deadline() {
    let log = MemoryHistoryHandler::with_initial_entry(EntryState::new(["home"]), DEFAULT_URL);
    let fixture = HistoryFixture::with_timers(log, HistoryConfig::default());
    let handle = fixture.drop_top();
    fixture.settle();
    assert!(!fixture.controller().is_settled());

    assert_eq!(handle.wait().await, DropOutcome::Completed);
    assert!(fixture.stack().is_empty());
    assert_settled(&fixture);
    assert_unreachable_forward(&fixture, 0, &"home");
    assert_eq!(fixture.log().entries().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_after_landing_changes_nothing() {
    let fixture = HistoryFixture::with_timers(MemoryHistoryHandler::new(), HistoryConfig::default());
    fixture.push("alpha");
    fixture.push("beta");
    let handle = fixture.drop_top();
    fixture.settle();
    assert_eq!(handle.wait().await, DropOutcome::Completed);
    let entries = fixture.log().entries();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(fixture.log().entries(), entries);
    assert_stack(&fixture, &["alpha"]);
    assert_settled(&fixture);
}
