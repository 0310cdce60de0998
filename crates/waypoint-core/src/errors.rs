//! Error types shared across Waypoint crates
//!
//! Effect-specific errors live next to their traits in [`crate::effects`].

/// Failure of a persistent list operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// An index argument fell outside the range the operation accepts.
    #[error("index out of range: {index} (length {len})")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Length of the input sequence
        len: usize,
    },
}

impl ListError {
    /// Create an out-of-range error for `index` against a sequence of `len`.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

/// Failure while loading or validating a [`crate::HistoryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid TOML for [`crate::HistoryConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but its values are inconsistent.
    #[error("invalid config value for `{key}`: {message}")]
    Invalid {
        /// Dotted key of the offending value
        key: String,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid-value error
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}
