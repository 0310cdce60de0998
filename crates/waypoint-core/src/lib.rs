//! Waypoint Core - Foundation for History-Backed Stacks
//!
//! This crate provides the pure building blocks that the history controller
//! is assembled from. It contains no runtime behavior of its own.
//!
//! # Architecture Layers
//!
//! ## Persistent Collections
//! - [`List`]: immutable, cheaply clonable sequence
//! - [`persistent::list`]: copy-on-write sequence operations
//! - [`persistent::set`], [`persistent::map`]: copy-on-write set and map helpers
//!
//! ## Entry State
//! - [`EntryState`]: the payload stored at one position of the host's
//!   back/forward log (`stack` + `isTransient`)
//!
//! ## Effect Interfaces (Pure Signatures)
//! - [`NavigationEffects`]: the host's navigation log
//! - [`TimerEffects`]: delayed task scheduling
//!
//! ## Configuration
//! - [`HistoryConfig`]: drop sequencing and corrective-hop limits

#![forbid(unsafe_code)]

/// Copy-on-write collection library
pub mod persistent;

/// Entry state stored in the navigation log
pub mod entry;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// History configuration
pub mod config;

/// Error types
pub mod errors;

pub use config::{DropConfig, DropSequencing, HistoryConfig};
pub use effects::{
    NavigationEffects, NavigationError, NavigationListener, TimerEffects, TimerError, TimerTask,
};
pub use entry::EntryState;
pub use errors::{ConfigError, ListError};
pub use persistent::List;
