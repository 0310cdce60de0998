//! Controller fixtures
//!
//! A [`HistoryFixture`] owns an in-memory navigation log, a controller
//! attached to it, and a recorder subscribed to the controller.

use crate::recorder::StackRecorder;
use crate::strategies::StackOp;
use waypoint_core::{DropConfig, DropSequencing, EntryState, HistoryConfig};
use waypoint_effects::{MemoryHistoryHandler, TokioTimerHandler, DEFAULT_URL};
use waypoint_history::{DropHandle, HistoryController};

/// Controller + in-memory log + recorder.
pub struct HistoryFixture<T> {
    log: MemoryHistoryHandler<T>,
    controller: HistoryController<T>,
    recorder: StackRecorder<T>,
}

impl<T: Clone + Send + Sync + 'static> Default for HistoryFixture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> HistoryFixture<T> {
    /// Default config over a fresh log.
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// `config` over a fresh log. Fixed-delay configs get tokio timers.
    pub fn with_config(config: HistoryConfig) -> Self {
        let timers = config.drop.sequencing == DropSequencing::FixedDelay;
        Self::attach(MemoryHistoryHandler::new(), config, timers)
    }

    /// `config` over `log`, always with tokio timers.
    ///
    /// In navigation-event mode the timers only bound how long a drop waits
    /// for its back navigation.
    pub fn with_timers(log: MemoryHistoryHandler<T>, config: HistoryConfig) -> Self {
        Self::attach(log, config, true)
    }

    /// Fixed-delay drop sequencing with the default delays over tokio timers.
    ///
    /// Drops only complete while a tokio runtime drives the timers.
    pub fn with_fixed_delay() -> Self {
        Self::with_config(HistoryConfig {
            drop: DropConfig {
                sequencing: DropSequencing::FixedDelay,
                ..DropConfig::default()
            },
            ..HistoryConfig::default()
        })
    }

    /// Attach to a log whose only entry already carries `entry`.
    pub fn with_initial_entry(entry: EntryState<T>) -> Self {
        Self::attach(
            MemoryHistoryHandler::with_initial_entry(entry, DEFAULT_URL),
            HistoryConfig::default(),
            false,
        )
    }

    fn attach(log: MemoryHistoryHandler<T>, config: HistoryConfig, timers: bool) -> Self {
        let controller = if timers {
            HistoryController::with_timers(log.clone(), TokioTimerHandler::new(), config)
        } else {
            HistoryController::new(log.clone(), config)
        }
        .expect("controller attaches to a fresh log");
        let (recorder, _subscription) = StackRecorder::attach(&controller);
        Self {
            log,
            controller,
            recorder,
        }
    }

    /// The navigation log.
    pub fn log(&self) -> &MemoryHistoryHandler<T> {
        &self.log
    }

    /// The controller under test.
    pub fn controller(&self) -> &HistoryController<T> {
        &self.controller
    }

    /// Everything the controller announced.
    pub fn recorder(&self) -> &StackRecorder<T> {
        &self.recorder
    }

    /// The controller's current stack as a `Vec`.
    pub fn stack(&self) -> Vec<T> {
        self.controller.get_current_stack().to_vec()
    }

    /// `push(value)` on the controller.
    pub fn push(&self, value: T) {
        self.controller.push(value);
    }

    /// `pop()` on the controller.
    pub fn pop(&self) {
        self.controller.pop();
    }

    /// `drop_top()` on the controller.
    pub fn drop_top(&self) -> DropHandle {
        self.controller.drop_top()
    }

    /// The user presses back.
    pub fn user_back(&self) {
        self.log.user_back();
    }

    /// The user presses forward.
    pub fn user_forward(&self) {
        self.log.user_forward();
    }

    /// Deliver every queued traversal, including corrective ones.
    pub fn settle(&self) -> usize {
        self.log.settle()
    }

    /// Apply one script step and let the log settle.
    pub fn apply(&self, op: &StackOp<T>) {
        match op {
            StackOp::Push(value) => self.push(value.clone()),
            StackOp::Pop => self.pop(),
            StackOp::Drop => {
                if self.controller.get_current_stack().len() >= 2 {
                    self.drop_top();
                }
            }
            StackOp::UserBack => self.user_back(),
            StackOp::UserForward => self.user_forward(),
        }
        self.settle();
    }
}
