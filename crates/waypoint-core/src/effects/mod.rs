//! Pure effect interfaces.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effects
//! - **Implementation**: `waypoint-effects`
//! - **Usage**: the history controller and anything else that needs to talk
//!   to the host's navigation log or schedule delayed work
//!
//! Traits here carry no behavior. Handlers live in `waypoint-effects`; test
//! fixtures built on them live in `waypoint-testkit`.

pub mod navigation;
pub mod timer;

pub use navigation::{NavigationEffects, NavigationError, NavigationListener};
pub use timer::{TimerEffects, TimerError, TimerTask};
