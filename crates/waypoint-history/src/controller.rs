//! History controller runtime
//!
//! Owns the [`HistoryMachine`] and executes the commands its transitions
//! produce against the navigation log, the timers and the stack listeners.
//!
//! Events are processed one at a time. Commands produced while another call
//! is already executing commands (a listener pushing from inside its
//! notification, a navigation event delivered synchronously by the host)
//! are queued behind the ones in progress, so the log sees writes in the
//! order the machine produced them.

use crate::error::HistoryError;
use crate::machine::{
    transition, DelayedStep, DropId, DropOutcome, HistoryCommand, HistoryEvent, HistoryMachine,
};
use futures::channel::oneshot;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use waypoint_core::{
    DropSequencing, EntryState, HistoryConfig, List, NavigationEffects, TimerEffects,
};

/// Callback invoked with the new stack on every stack change.
pub type StackListener<T> = Arc<dyn Fn(&List<T>) + Send + Sync>;

struct Runtime<T> {
    machine: HistoryMachine<T>,
    queue: VecDeque<HistoryCommand<T>>,
    draining: bool,
}

struct Shared<T> {
    navigation: Arc<dyn NavigationEffects<T>>,
    timers: Option<Arc<dyn TimerEffects>>,
    runtime: Mutex<Runtime<T>>,
    listeners: Mutex<Vec<(u64, StackListener<T>)>>,
    next_listener: AtomicU64,
    drops: Mutex<HashMap<DropId, oneshot::Sender<DropOutcome>>>,
    next_drop: AtomicU64,
    stack_tx: watch::Sender<List<T>>,
}

/// Keeps an application stack in the host's navigation log.
///
/// Cloning yields another handle onto the same controller. The navigation
/// listener installed at construction only holds a weak reference, so the
/// controller is torn down when the last handle is dropped.
pub struct HistoryController<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for HistoryController<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> HistoryController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Attach a controller to `navigation`.
    ///
    /// Fails when the log refuses the navigation listener or the config is
    /// invalid. Fixed-delay drop sequencing needs [`with_timers`](Self::with_timers).
    pub fn new<N>(navigation: N, config: HistoryConfig) -> Result<Self, HistoryError>
    where
        N: NavigationEffects<T> + 'static,
    {
        Self::build(Arc::new(navigation), None, config)
    }

    /// Attach a controller to `navigation`, using `timers` for fixed-delay
    /// drop sequencing.
    pub fn with_timers<N, M>(
        navigation: N,
        timers: M,
        config: HistoryConfig,
    ) -> Result<Self, HistoryError>
    where
        N: NavigationEffects<T> + 'static,
        M: TimerEffects + 'static,
    {
        Self::build(Arc::new(navigation), Some(Arc::new(timers)), config)
    }

    fn build(
        navigation: Arc<dyn NavigationEffects<T>>,
        timers: Option<Arc<dyn TimerEffects>>,
        config: HistoryConfig,
    ) -> Result<Self, HistoryError> {
        config.validate()?;
        if config.drop.sequencing == DropSequencing::FixedDelay && timers.is_none() {
            return Err(HistoryError::MissingTimers);
        }

        let initial = navigation.current_entry();
        if initial.as_ref().is_some_and(|e| e.is_transient) {
            tracing::warn!("attached while a transient entry is active");
        }
        let machine = HistoryMachine::new(initial, &config);
        let (stack_tx, _) = watch::channel(machine.stack());

        let shared = Arc::new(Shared {
            navigation,
            timers,
            runtime: Mutex::new(Runtime {
                machine,
                queue: VecDeque::new(),
                draining: false,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            drops: Mutex::new(HashMap::new()),
            next_drop: AtomicU64::new(0),
            stack_tx,
        });

        let weak = Arc::downgrade(&shared);
        shared
            .navigation
            .on_navigate(Arc::new(move |entry: Option<EntryState<T>>| {
                if let Some(shared) = weak.upgrade() {
                    shared.dispatch(HistoryEvent::Navigated(entry));
                }
            }))?;

        tracing::debug!(
            sequencing = ?config.drop.sequencing,
            depth = shared.runtime.lock().machine.stack().len(),
            "history controller attached"
        );
        Ok(Self { shared })
    }

    /// The current stack; empty when the active entry carries no state.
    pub fn get_current_stack(&self) -> List<T> {
        self.shared.runtime.lock().machine.stack()
    }

    /// The cached state of the active entry.
    pub fn current_entry(&self) -> Option<EntryState<T>> {
        self.shared.runtime.lock().machine.current().cloned()
    }

    /// Whether no navigation, correction or delayed write is outstanding.
    pub fn is_settled(&self) -> bool {
        let runtime = self.shared.runtime.lock();
        runtime.machine.is_settled() && runtime.queue.is_empty()
    }

    /// Call `listener` with the new stack on every change.
    ///
    /// Listeners run synchronously, in subscription order, and may call back
    /// into the controller. Such a nested call only updates the stack before
    /// returning; its log writes run once the current notification finishes.
    /// Dropping the returned subscription keeps the listener installed; call
    /// [`StackSubscription::unsubscribe`] to remove it.
    pub fn subscribe_to_stack_change<F>(&self, listener: F) -> StackSubscription<T>
    where
        F: Fn(&List<T>) + Send + Sync + 'static,
    {
        let id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        self.shared.listeners.lock().push((id, Arc::new(listener)));
        StackSubscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// A receiver that always holds the latest notified stack.
    pub fn watch_stack(&self) -> watch::Receiver<List<T>> {
        self.shared.stack_tx.subscribe()
    }

    /// Push `value`, keeping the active entry's URL.
    ///
    /// The new entry is active on return, except when called from a stack
    /// listener: then it is written after the listener returns.
    pub fn push(&self, value: T) {
        self.shared.dispatch(HistoryEvent::Push { value, url: None });
    }

    /// Push `value` under `url`.
    pub fn push_with_url(&self, value: T, url: impl Into<String>) {
        self.shared.dispatch(HistoryEvent::Push {
            value,
            url: Some(url.into()),
        });
    }

    /// Go back one entry.
    ///
    /// Listeners are told about the active entry straight away; the host's
    /// navigation event corrects that once the traversal completes.
    pub fn pop(&self) {
        self.shared.dispatch(HistoryEvent::Pop);
    }

    /// Remove the top value so that it cannot be reached again by forward
    /// navigation.
    ///
    /// The returned handle resolves once the drop finished or was taken over
    /// by a later operation. Ignoring it is fine. With a timer handler the
    /// drop happens in place if its back navigation never lands, as at the
    /// start of the log; without one it waits for the next operation.
    pub fn drop_top(&self) -> DropHandle {
        let drop = DropId(self.shared.next_drop.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.shared.drops.lock().insert(drop, tx);
        self.shared.dispatch(HistoryEvent::Drop { drop });
        DropHandle {
            drop,
            receiver: rx,
            outcome: None,
        }
    }
}

impl<T> Shared<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn dispatch(self: &Arc<Self>, event: HistoryEvent<T>) {
        {
            let mut runtime = self.runtime.lock();
            let kind = event.kind();
            let (machine, commands) = transition(&runtime.machine, event);
            tracing::debug!(
                event = kind,
                commands = commands.len(),
                settled = machine.is_settled(),
                "history transition"
            );
            runtime.machine = machine;
            runtime.queue.extend(commands);
            if runtime.draining {
                return;
            }
            runtime.draining = true;
        }

        loop {
            let command = {
                let mut runtime = self.runtime.lock();
                match runtime.queue.pop_front() {
                    Some(command) => command,
                    None => {
                        runtime.draining = false;
                        return;
                    }
                }
            };
            self.execute(command);
        }
    }

    fn execute(self: &Arc<Self>, command: HistoryCommand<T>) {
        match command {
            HistoryCommand::Notify(stack) => self.notify(&stack),
            HistoryCommand::PushEntry { state, url } => {
                let url = url.unwrap_or_else(|| self.navigation.current_url());
                tracing::trace!(depth = state.depth(), %url, "pushing entry");
                if let Err(e) = self.navigation.push_entry(state, &url) {
                    tracing::warn!(error = %e, "failed to push navigation entry");
                }
            }
            HistoryCommand::ReplaceEntry { state } => {
                let url = self.navigation.current_url();
                tracing::trace!(
                    depth = state.depth(),
                    transient = state.is_transient,
                    "replacing entry"
                );
                if let Err(e) = self.navigation.replace_entry(state, &url) {
                    tracing::warn!(error = %e, "failed to replace navigation entry");
                }
            }
            HistoryCommand::GoBack => {
                if let Err(e) = self.navigation.go_back() {
                    tracing::warn!(error = %e, "failed to navigate back");
                }
            }
            HistoryCommand::GoForward => {
                if let Err(e) = self.navigation.go_forward() {
                    tracing::warn!(error = %e, "failed to navigate forward");
                }
            }
            HistoryCommand::ReadActiveEntry => {
                let entry = self.navigation.current_entry();
                self.dispatch(HistoryEvent::ActiveEntryRead(entry));
            }
            HistoryCommand::Schedule { drop, step, after } => self.schedule(drop, step, after),
            HistoryCommand::ResolveDrop { drop, outcome } => {
                tracing::debug!(%drop, ?outcome, "drop resolved");
                if let Some(tx) = self.drops.lock().remove(&drop) {
                    // The handle may already be gone.
                    let _ = tx.send(outcome);
                }
            }
        }
    }

    fn notify(&self, stack: &List<T>) {
        self.stack_tx.send_replace(stack.clone());
        let listeners: Vec<StackListener<T>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(stack);
        }
    }

    fn schedule(self: &Arc<Self>, drop: DropId, step: DelayedStep, after: Duration) {
        let event = HistoryEvent::DelayElapsed { drop, step };
        // Deadlines never run early.
        let immediate = step != DelayedStep::LandingDeadline;
        let Some(timers) = self.timers.clone() else {
            if !immediate {
                tracing::trace!(%drop, "no timer handler, drop waits for its navigation");
                return;
            }
            tracing::warn!(%drop, ?step, "no timer handler, running delayed step now");
            self.dispatch(event);
            return;
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        let task = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.dispatch(HistoryEvent::DelayElapsed { drop, step });
            }
        });
        if let Err(e) = timers.schedule(after, task) {
            if immediate {
                tracing::warn!(%drop, ?step, error = %e, "failed to schedule delayed step, running it now");
                self.dispatch(event);
            } else {
                tracing::warn!(%drop, error = %e, "failed to schedule drop deadline");
            }
        }
    }
}

/// Handle to a stack listener installed by
/// [`HistoryController::subscribe_to_stack_change`].
pub struct StackSubscription<T> {
    id: u64,
    shared: Weak<Shared<T>>,
}

impl<T> StackSubscription<T> {
    /// Remove the listener. Other listeners, including ones registered with
    /// the same closure, stay installed.
    pub fn unsubscribe(self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Completion signal of one [`HistoryController::drop_top`] call.
#[derive(Debug)]
pub struct DropHandle {
    drop: DropId,
    receiver: oneshot::Receiver<DropOutcome>,
    outcome: Option<DropOutcome>,
}

impl DropHandle {
    /// Identifier of the drop.
    pub fn id(&self) -> DropId {
        self.drop
    }

    /// Wait for the drop to finish.
    ///
    /// Resolves to [`DropOutcome::Abandoned`] if the controller is dropped
    /// first.
    pub async fn wait(self) -> DropOutcome {
        match self.outcome {
            Some(outcome) => outcome,
            None => self.receiver.await.unwrap_or(DropOutcome::Abandoned),
        }
    }

    /// The outcome, if the drop already finished. Repeated calls keep
    /// returning it.
    pub fn try_outcome(&mut self) -> Option<DropOutcome> {
        if self.outcome.is_none() {
            self.outcome = match self.receiver.try_recv() {
                Ok(outcome) => outcome,
                Err(_) => Some(DropOutcome::Abandoned),
            };
        }
        self.outcome
    }
}
