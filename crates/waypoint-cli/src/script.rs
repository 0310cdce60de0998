//! Script steps and the session that runs them.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::str::FromStr;
use std::time::Duration;
use waypoint_core::{HistoryConfig, NavigationEffects};
use waypoint_effects::{MemoryHistoryHandler, TokioTimerHandler};
use waypoint_history::{HistoryController, HistoryError};

const WORDS: &[&str] = &[
    "abandon", "ability", "able", "about", "above", "absent", "absorb", "abstract", "absurd",
    "abuse", "access", "accident", "account", "accuse", "achieve", "acid", "acoustic", "acquire",
    "across", "act", "action", "actor", "actress", "actual", "adapt", "add", "addict", "address",
    "adjust", "admit", "adult", "advance", "advice", "aerobic", "affair", "afford", "afraid",
    "again", "age", "agent", "agree", "ahead", "aim", "air", "airport", "aisle", "alarm", "album",
];

/// Polling interval while fixed-delay timers are outstanding.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Push the given word, or a random one
    Push(Option<String>),
    /// Pop the top value
    Pop,
    /// Drop the top value
    Drop,
    /// The user presses back
    Back,
    /// The user presses forward
    Forward,
    /// Print the stack without doing anything
    Show,
}

/// Unparseable step.
#[derive(Debug, thiserror::Error)]
#[error("unknown step `{0}` (expected push, push=<word>, pop, drop, back, forward or show)")]
pub struct StepParseError(String);

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(Self::Push(None)),
            "pop" => Ok(Self::Pop),
            "drop" => Ok(Self::Drop),
            "back" => Ok(Self::Back),
            "forward" => Ok(Self::Forward),
            "show" => Ok(Self::Show),
            other => match other.strip_prefix("push=") {
                Some(word) if !word.is_empty() => Ok(Self::Push(Some(word.to_string()))),
                _ => Err(StepParseError(other.to_string())),
            },
        }
    }
}

/// A controller over a fresh in-memory log.
pub struct Session {
    log: MemoryHistoryHandler<String>,
    history: HistoryController<String>,
    rng: StdRng,
    settle_budget: u32,
}

impl Session {
    /// Attach a controller configured by `config`.
    pub fn new(config: HistoryConfig, seed: Option<u64>) -> Result<Self, HistoryError> {
        let log = MemoryHistoryHandler::new();
        let settle_budget = u32::try_from(
            config.drop.final_delay().as_millis() / POLL_INTERVAL.as_millis() + 2,
        )
        .unwrap_or(u32::MAX);

        // Timers also bound event-confirmed drops whose navigation never lands.
        let history =
            HistoryController::with_timers(log.clone(), TokioTimerHandler::new(), config)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            log,
            history,
            rng,
            settle_budget,
        })
    }

    /// Run one step, wait for it to settle, and describe the result.
    pub async fn run_step(&mut self, step: &Step) -> String {
        let depth = self.history.get_current_stack().len();
        let label = match step {
            Step::Push(word) => {
                let word = word.clone().unwrap_or_else(|| self.random_word());
                let label = format!("push {word}");
                self.history.push(word);
                label
            }
            Step::Pop => {
                self.history.pop();
                "pop".to_string()
            }
            Step::Drop if depth <= 1 => {
                tracing::info!(depth, "drop needs at least two values, skipping");
                "drop (skipped)".to_string()
            }
            Step::Drop => {
                self.history.drop_top();
                "drop".to_string()
            }
            Step::Back => {
                self.log.user_back();
                "back".to_string()
            }
            Step::Forward => {
                self.log.user_forward();
                "forward".to_string()
            }
            Step::Show => "show".to_string(),
        };

        self.settle().await;
        format!("{label:<20} {}", self.describe_stack())
    }

    async fn settle(&self) {
        self.log.settle();
        let mut polls = 0;
        while !self.history.is_settled() && polls < self.settle_budget {
            tokio::time::sleep(POLL_INTERVAL).await;
            self.log.settle();
            polls += 1;
        }
        if !self.history.is_settled() {
            tracing::warn!(polls, "history did not settle");
        }
    }

    fn random_word(&mut self) -> String {
        WORDS
            .choose(&mut self.rng)
            .map_or_else(|| "word".to_string(), |word| (*word).to_string())
    }

    fn describe_stack(&self) -> String {
        format!("[{}]", self.history.get_current_stack().join(", "))
    }

    /// One line per log entry, the active one marked.
    pub fn describe_log(&self) -> Vec<String> {
        let active = self.log.active_index();
        let url = self.log.current_url();
        tracing::debug!(%url, active, "dumping navigation log");

        self.log
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let marker = if index == active { '>' } else { ' ' };
                match &entry.state {
                    Some(state) => format!(
                        "{marker} {index:>3} [{}]{}",
                        state.stack.join(", "),
                        if state.is_transient { " (waypoint)" } else { "" }
                    ),
                    None => format!("{marker} {index:>3} (no state)"),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::DropSequencing;

    #[test]
    fn test_parse_steps() {
        assert_eq!("push".parse::<Step>().unwrap(), Step::Push(None));
        assert_eq!(
            "push=alpha".parse::<Step>().unwrap(),
            Step::Push(Some("alpha".to_string()))
        );
        assert_eq!("drop".parse::<Step>().unwrap(), Step::Drop);
        assert!("push=".parse::<Step>().is_err());
        assert!("jump".parse::<Step>().is_err());
    }

    #[tokio::test]
    async fn test_session_runs_demo_script() {
        let mut session = Session::new(HistoryConfig::default(), Some(7)).unwrap();
        for step in ["push=alpha", "push=beta", "push=gamma", "drop", "pop"] {
            session.run_step(&step.parse().unwrap()).await;
        }

        assert_eq!(session.history.get_current_stack().to_vec(), vec!["alpha"]);
        assert!(session.describe_log()[1].starts_with(">"));
    }

    #[tokio::test]
    async fn test_drop_skipped_below_two_values() {
        let mut session = Session::new(HistoryConfig::default(), Some(7)).unwrap();
        session.run_step(&Step::Push(None)).await;
        let line = session.run_step(&Step::Drop).await;

        assert!(line.starts_with("drop (skipped)"));
        assert_eq!(session.history.get_current_stack().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_waits_for_fixed_delay_drop() {
        let mut config = HistoryConfig::default();
        config.drop.sequencing = DropSequencing::FixedDelay;
        let mut session = Session::new(config, None).unwrap();
        for step in ["push=alpha", "push=beta", "drop"] {
            session.run_step(&step.parse().unwrap()).await;
        }

        assert!(session.history.is_settled());
        assert_eq!(session.history.get_current_stack().to_vec(), vec!["alpha"]);
    }
}
