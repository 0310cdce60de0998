//! Stack synchronization state machine
//!
//! `HistoryMachine × HistoryEvent → (HistoryMachine, Vec<HistoryCommand>)`
//!
//! [`transition`] is pure: it never touches the navigation log, timers or
//! listeners. Everything it wants done is returned as commands, which the
//! controller runtime executes in order. This keeps every interleaving of
//! user navigation, programmatic navigation and timers testable without a
//! host.

mod commands;
mod events;

pub use commands::{DropOutcome, HistoryCommand};
pub use events::{DelayedStep, DropId, HistoryEvent};

use std::time::Duration;
use waypoint_core::persistent::list;
use waypoint_core::{DropSequencing, EntryState, HistoryConfig, List};

/// Direction of a corrective hop over a transient entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopDirection {
    /// Skip behind the waypoint
    Back,
    /// Skip past the waypoint
    Forward,
}

/// What the machine is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    /// Nothing in flight
    Settled,
    /// A corrective hop over a transient entry was issued
    AwaitingCorrection {
        /// Direction every further hop keeps
        direction: HopDirection,
        /// Hops issued so far
        hops: u32,
    },
    /// A drop issued its back navigation and waits for it to land
    AwaitingDropBack {
        /// The pending drop
        drop: DropId,
        /// Stack once the drop completes
        next_stack: List<T>,
        /// Depth of the stack the drop was issued from
        from_depth: usize,
        /// Transient entries skipped so far
        hops: u32,
    },
}

/// A fixed-delay drop whose timers have not all fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedDrop<T> {
    /// The drop the timers belong to
    pub drop: DropId,
    /// Stack once the drop completes
    pub next_stack: List<T>,
}

/// State of the stack controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMachine<T> {
    current: Option<EntryState<T>>,
    phase: Phase<T>,
    delayed_drop: Option<DelayedDrop<T>>,
    sequencing: DropSequencing,
    waypoint_delay: Duration,
    final_delay: Duration,
    max_corrective_hops: u32,
}

impl<T: Clone> HistoryMachine<T> {
    /// A settled machine whose cached entry is `current`.
    pub fn new(current: Option<EntryState<T>>, config: &HistoryConfig) -> Self {
        Self {
            current,
            phase: Phase::Settled,
            delayed_drop: None,
            sequencing: config.drop.sequencing,
            waypoint_delay: config.drop.waypoint_delay(),
            final_delay: config.drop.final_delay(),
            max_corrective_hops: config.max_corrective_hops,
        }
    }

    /// Cached state of the active entry.
    pub fn current(&self) -> Option<&EntryState<T>> {
        self.current.as_ref()
    }

    /// Cached stack; empty when the active entry carries no state.
    pub fn stack(&self) -> List<T> {
        self.current
            .as_ref()
            .map(|entry| entry.stack.clone())
            .unwrap_or_default()
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    /// Pending fixed-delay drop, if any.
    pub fn delayed_drop(&self) -> Option<&DelayedDrop<T>> {
        self.delayed_drop.as_ref()
    }

    /// Whether no navigation, correction or delayed write is outstanding.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Settled) && self.delayed_drop.is_none()
    }

    /// The drop that is still in progress, if any.
    pub fn pending_drop(&self) -> Option<DropId> {
        match (&self.phase, &self.delayed_drop) {
            (Phase::AwaitingDropBack { drop, .. }, _) => Some(*drop),
            (_, Some(delayed)) => Some(delayed.drop),
            _ => None,
        }
    }

    fn current_depth(&self) -> usize {
        self.current.as_ref().map_or(0, EntryState::depth)
    }

    /// Resolve any in-flight drop as superseded and forget about it.
    fn supersede(&mut self, commands: &mut Vec<HistoryCommand<T>>) {
        if let Phase::AwaitingDropBack { drop, .. } = &self.phase {
            tracing::debug!(%drop, "drop superseded before its back navigation landed");
            commands.push(HistoryCommand::ResolveDrop {
                drop: *drop,
                outcome: DropOutcome::Superseded,
            });
        }
        if let Some(delayed) = self.delayed_drop.take() {
            tracing::debug!(drop = %delayed.drop, "drop superseded before its delayed writes");
            commands.push(HistoryCommand::ResolveDrop {
                drop: delayed.drop,
                outcome: DropOutcome::Superseded,
            });
        }
        self.phase = Phase::Settled;
    }

    /// Replace the cached entry with a regular entry and announce it.
    fn settle_on(&mut self, entry: Option<EntryState<T>>, commands: &mut Vec<HistoryCommand<T>>) {
        self.current = entry;
        self.phase = Phase::Settled;
        commands.push(HistoryCommand::Notify(self.stack()));
    }
}

/// Pure state transition.
pub fn transition<T: Clone>(
    machine: &HistoryMachine<T>,
    event: HistoryEvent<T>,
) -> (HistoryMachine<T>, Vec<HistoryCommand<T>>) {
    let mut next = machine.clone();
    let mut commands = Vec::new();

    match event {
        HistoryEvent::Push { value, url } => {
            handle_push(&mut next, &mut commands, value, url);
        }
        HistoryEvent::Pop => {
            next.supersede(&mut commands);
            commands.push(HistoryCommand::GoBack);
            commands.push(HistoryCommand::ReadActiveEntry);
        }
        HistoryEvent::Drop { drop } => {
            handle_drop(&mut next, &mut commands, drop);
        }
        HistoryEvent::Navigated(entry) => {
            handle_navigated(&mut next, &mut commands, entry);
        }
        HistoryEvent::ActiveEntryRead(entry) => {
            if entry.as_ref().is_some_and(|e| e.is_transient) {
                tracing::debug!("optimistic read hit a transient entry, waiting for navigation");
            } else {
                next.current = entry;
                commands.push(HistoryCommand::Notify(next.stack()));
            }
        }
        HistoryEvent::DelayElapsed { drop, step } => {
            handle_delay_elapsed(&mut next, &mut commands, drop, step);
        }
    }

    (next, commands)
}

fn handle_push<T: Clone>(
    machine: &mut HistoryMachine<T>,
    commands: &mut Vec<HistoryCommand<T>>,
    value: T,
    url: Option<String>,
) {
    machine.supersede(commands);
    let entry = EntryState::new(list::push(&machine.stack(), [value]));
    machine.settle_on(Some(entry.clone()), commands);
    commands.push(HistoryCommand::PushEntry { state: entry, url });
}

fn handle_drop<T: Clone>(
    machine: &mut HistoryMachine<T>,
    commands: &mut Vec<HistoryCommand<T>>,
    drop: DropId,
) {
    machine.supersede(commands);
    let from_depth = machine.current_depth();
    let next_stack = list::pop(&machine.stack());
    commands.push(HistoryCommand::GoBack);

    match machine.sequencing {
        DropSequencing::NavigationEvent => {
            machine.phase = Phase::AwaitingDropBack {
                drop,
                next_stack,
                from_depth,
                hops: 0,
            };
            // Runs only when the host offers timers.
            commands.push(HistoryCommand::Schedule {
                drop,
                step: DelayedStep::LandingDeadline,
                after: machine.final_delay,
            });
        }
        DropSequencing::FixedDelay => {
            machine.delayed_drop = Some(DelayedDrop { drop, next_stack });
            commands.push(HistoryCommand::Schedule {
                drop,
                step: DelayedStep::WriteWaypoint,
                after: machine.waypoint_delay,
            });
            commands.push(HistoryCommand::Schedule {
                drop,
                step: DelayedStep::PushFinal,
                after: machine.final_delay,
            });
        }
    }
}

fn handle_navigated<T: Clone>(
    machine: &mut HistoryMachine<T>,
    commands: &mut Vec<HistoryCommand<T>>,
    entry: Option<EntryState<T>>,
) {
    let transient = entry.as_ref().is_some_and(|e| e.is_transient);
    let depth = entry.as_ref().map_or(0, EntryState::depth);

    match machine.phase.clone() {
        Phase::AwaitingDropBack {
            drop,
            next_stack,
            from_depth,
            hops,
        } => {
            // Only a move back can be the drop's own navigation. Waypoints
            // behind the dropped entry may be as deep as it, and an empty
            // stack can only land on another empty entry.
            let moved_back = if transient {
                depth <= from_depth
            } else {
                depth < from_depth.max(1)
            };
            if !moved_back {
                tracing::debug!(%drop, depth, from_depth, "navigation away from a pending drop");
                machine.phase = Phase::Settled;
                commands.push(HistoryCommand::ResolveDrop {
                    drop,
                    outcome: DropOutcome::Abandoned,
                });
                handle_navigated(machine, commands, entry);
                return;
            }

            if transient {
                // The waypoint has to overwrite a regular entry, so keep going.
                if hops >= machine.max_corrective_hops {
                    tracing::warn!(%drop, hops, "drop gave up skipping transient entries");
                    machine.phase = Phase::Settled;
                    commands.push(HistoryCommand::ResolveDrop {
                        drop,
                        outcome: DropOutcome::Abandoned,
                    });
                    return;
                }
                machine.phase = Phase::AwaitingDropBack {
                    drop,
                    next_stack,
                    from_depth,
                    hops: hops + 1,
                };
                commands.push(HistoryCommand::GoBack);
                return;
            }

            complete_drop(machine, commands, drop, next_stack);
        }
        Phase::Settled | Phase::AwaitingCorrection { .. } => {
            if !transient {
                machine.settle_on(entry, commands);
                return;
            }

            let (direction, hops) = match machine.phase {
                Phase::AwaitingCorrection { direction, hops } => (direction, hops),
                _ if depth > machine.current_depth() => (HopDirection::Forward, 0),
                _ => (HopDirection::Back, 0),
            };
            if hops >= machine.max_corrective_hops {
                tracing::warn!(hops, "corrective hop budget exhausted on a transient entry");
                machine.phase = Phase::Settled;
                return;
            }

            commands.push(match direction {
                HopDirection::Forward => HistoryCommand::GoForward,
                HopDirection::Back => HistoryCommand::GoBack,
            });
            machine.phase = Phase::AwaitingCorrection {
                direction,
                hops: hops + 1,
            };
        }
    }
}

/// Overwrite the active entry with the waypoint and push the reduced stack.
fn complete_drop<T: Clone>(
    machine: &mut HistoryMachine<T>,
    commands: &mut Vec<HistoryCommand<T>>,
    drop: DropId,
    next_stack: List<T>,
) {
    let final_entry = EntryState::new(next_stack.clone());
    commands.push(HistoryCommand::ReplaceEntry {
        state: EntryState::transient(next_stack),
    });
    machine.settle_on(Some(final_entry.clone()), commands);
    commands.push(HistoryCommand::PushEntry {
        state: final_entry,
        url: None,
    });
    commands.push(HistoryCommand::ResolveDrop {
        drop,
        outcome: DropOutcome::Completed,
    });
}

fn handle_delay_elapsed<T: Clone>(
    machine: &mut HistoryMachine<T>,
    commands: &mut Vec<HistoryCommand<T>>,
    drop: DropId,
    step: DelayedStep,
) {
    if step == DelayedStep::LandingDeadline {
        match machine.phase.clone() {
            Phase::AwaitingDropBack {
                drop: pending,
                next_stack,
                ..
            } if pending == drop => {
                tracing::warn!(%drop, "back navigation never landed, dropping in place");
                complete_drop(machine, commands, drop, next_stack);
            }
            _ => tracing::trace!(%drop, "drop landed before its deadline"),
        }
        return;
    }

    let Some(delayed) = machine.delayed_drop.clone().filter(|d| d.drop == drop) else {
        tracing::debug!(%drop, ?step, "ignoring timer of a finished drop");
        return;
    };

    match step {
        DelayedStep::WriteWaypoint => {
            let waypoint = EntryState::transient(delayed.next_stack);
            machine.current = Some(waypoint.clone());
            commands.push(HistoryCommand::ReplaceEntry { state: waypoint });
        }
        // Handled above.
        DelayedStep::LandingDeadline => {}
        DelayedStep::PushFinal => {
            let final_entry = EntryState::new(delayed.next_stack);
            machine.delayed_drop = None;
            machine.current = Some(final_entry.clone());
            commands.push(HistoryCommand::Notify(final_entry.stack.clone()));
            commands.push(HistoryCommand::PushEntry {
                state: final_entry,
                url: None,
            });
            commands.push(HistoryCommand::ResolveDrop {
                drop,
                outcome: DropOutcome::Completed,
            });
        }
    }
}
