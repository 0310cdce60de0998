//! History configuration.
//!
//! ```toml
//! max_corrective_hops = 64
//!
//! [drop]
//! sequencing = "navigation-event"
//! waypoint_delay_ms = 50
//! final_delay_ms = 100
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "WAYPOINT_";

/// How the two writes of a drop are sequenced after its back navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropSequencing {
    /// Write the waypoint and the final entry as soon as the host reports
    /// that the back navigation completed.
    #[default]
    NavigationEvent,
    /// Write them after fixed delays, without waiting for the host. Only
    /// useful for hosts that never report their own back navigations.
    FixedDelay,
}

impl std::str::FromStr for DropSequencing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "navigation-event" => Ok(Self::NavigationEvent),
            "fixed-delay" => Ok(Self::FixedDelay),
            other => Err(ConfigError::invalid(
                "drop.sequencing",
                format!("expected `navigation-event` or `fixed-delay`, got `{other}`"),
            )),
        }
    }
}

/// Drop sequencing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Sequencing strategy
    pub sequencing: DropSequencing,
    /// Fixed-delay mode: delay before the waypoint is written
    pub waypoint_delay_ms: u64,
    /// Fixed-delay mode: delay before the final entry is pushed
    pub final_delay_ms: u64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            sequencing: DropSequencing::NavigationEvent,
            waypoint_delay_ms: 50,
            final_delay_ms: 100,
        }
    }
}

impl DropConfig {
    /// Delay before the waypoint write.
    pub fn waypoint_delay(&self) -> Duration {
        Duration::from_millis(self.waypoint_delay_ms)
    }

    /// Delay before the final push.
    pub fn final_delay(&self) -> Duration {
        Duration::from_millis(self.final_delay_ms)
    }
}

/// Configuration for a history controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Upper bound on consecutive corrective hops over transient entries
    pub max_corrective_hops: u32,
    /// Drop sequencing
    pub drop: DropConfig,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_corrective_hops: 64,
            drop: DropConfig::default(),
        }
    }
}

impl HistoryConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file and validate it.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render the config as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::invalid("<root>", e.to_string()))
    }

    /// Apply `WAYPOINT_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `WAYPOINT_*` overrides from `vars`, then validate.
    ///
    /// Recognized keys: `WAYPOINT_MAX_CORRECTIVE_HOPS`,
    /// `WAYPOINT_DROP_SEQUENCING`, `WAYPOINT_DROP_WAYPOINT_DELAY_MS`,
    /// `WAYPOINT_DROP_FINAL_DELAY_MS`. Other `WAYPOINT_` keys are ignored.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(key) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref();
            match key {
                "MAX_CORRECTIVE_HOPS" => {
                    self.max_corrective_hops = parse_number("max_corrective_hops", value)?;
                }
                "DROP_SEQUENCING" => self.drop.sequencing = value.parse()?,
                "DROP_WAYPOINT_DELAY_MS" => {
                    self.drop.waypoint_delay_ms = parse_number("drop.waypoint_delay_ms", value)?;
                }
                "DROP_FINAL_DELAY_MS" => {
                    self.drop.final_delay_ms = parse_number("drop.final_delay_ms", value)?;
                }
                other => tracing::debug!(key = other, "ignoring unknown config override"),
            }
        }
        self.validate()
    }

    /// Check that the values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_corrective_hops == 0 {
            return Err(ConfigError::invalid(
                "max_corrective_hops",
                "must allow at least one hop",
            ));
        }

        if self.drop.sequencing == DropSequencing::FixedDelay {
            if self.drop.waypoint_delay_ms == 0 {
                return Err(ConfigError::invalid(
                    "drop.waypoint_delay_ms",
                    "must be positive so the back navigation can land first",
                ));
            }
            if self.drop.final_delay_ms <= self.drop.waypoint_delay_ms {
                return Err(ConfigError::invalid(
                    "drop.final_delay_ms",
                    "must be greater than drop.waypoint_delay_ms",
                ));
            }
        }

        Ok(())
    }
}

fn parse_number<N: std::str::FromStr>(key: &str, value: &str) -> Result<N, ConfigError>
where
    N::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(key, format!("`{value}`: {e}")))
}
