//! Waypoint Testing Infrastructure
//!
//! Fixtures that wire a [`HistoryController`](waypoint_history::HistoryController)
//! to an in-memory navigation log, listeners that record what they were
//! told, assertions for the steady-state invariant, and proptest strategies
//! for operation scripts.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! waypoint-testkit = { path = "../waypoint-testkit" }
//! ```
//!
//! ```rust
//! use waypoint_testkit::*;
//!
//! let fixture = HistoryFixture::new();
//! fixture.push("alpha");
//! fixture.push("beta");
//! fixture.settle();
//! assert_settled(&fixture);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod recorder;
pub mod strategies;

pub use assertions::*;
pub use fixtures::*;
pub use recorder::*;

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
