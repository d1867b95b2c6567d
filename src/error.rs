//! Errors raised while setting up or selecting a benchmark.
//!
//! Operation outcomes (an insert that found the key, a remove that found
//! nothing) are not errors and never show up here.

use std::fmt as StdFmt;

/// Setup-time failures. All of them abort the run before measurement starts.
#[derive(Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// A configuration value violated a constraint.
    Configuration {
        /// Name of the offending option (e.g. `insert_ratio`).
        param: &'static str,
        /// The rejected value, rendered for display.
        value: String,
        /// Which constraint was violated.
        reason: &'static str,
    },

    /// Prefill could not populate the map.
    Initialization {
        /// The key whose insert was rejected, if the worker got that far.
        key: Option<u64>,
        /// Keys successfully inserted before the failure.
        inserted: u64,
    },

    /// A benchmark thread could not be created; the run was abandoned.
    Spawn {
        /// Id of the thread that failed to start.
        thread: u32,
        /// The OS error.
        reason: String,
    },

    /// No benchmark is registered under this name.
    UnknownBenchmark(String),

    /// No variant with this name exists in the selected benchmark.
    UnknownVariant(String),

    /// Configuration input could not be read or parsed.
    Config(String),
}

impl HarnessError {
    /// Shorthand for [`HarnessError::Configuration`].
    pub fn configuration(
        param: &'static str,
        value: impl StdFmt::Display,
        reason: &'static str,
    ) -> Self {
        Self::Configuration {
            param,
            value: value.to_string(),
            reason,
        }
    }
}

impl StdFmt::Display for HarnessError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::Configuration {
                param,
                value,
                reason,
            } => write!(f, "invalid configuration: {param}={value}: {reason}"),

            Self::Initialization {
                key: Some(key),
                inserted,
            } => write!(
                f,
                "initialization of map failed: insert of key {key} rejected after {inserted} keys"
            ),

            Self::Initialization { key: None, inserted } => write!(
                f,
                "initialization of map failed: prefill worker aborted after {inserted} keys"
            ),

            Self::Spawn { thread, reason } => {
                write!(f, "could not start benchmark thread {thread}: {reason}")
            }

            Self::UnknownBenchmark(name) => write!(f, "unknown benchmark: {name}"),

            Self::UnknownVariant(name) => write!(f, "unknown benchmark variant: {name}"),

            Self::Config(msg) => write!(f, "could not load configuration: {msg}"),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used across the crate.
pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_param_and_value() {
        let err = HarnessError::configuration("insert_ratio", 1.5, "must be within [0.0, 1.0]");
        let msg = err.to_string();
        assert!(msg.contains("insert_ratio"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn initialization_error_reports_key_when_known() {
        let err = HarnessError::Initialization {
            key: Some(18),
            inserted: 2,
        };
        assert!(err.to_string().contains("key 18"));

        let err = HarnessError::Initialization {
            key: None,
            inserted: 0,
        };
        assert!(err.to_string().contains("aborted"));
    }

    #[test]
    fn spawn_error_names_thread() {
        let err = HarnessError::Spawn {
            thread: 3,
            reason: "Resource temporarily unavailable".to_string(),
        };
        assert!(err.to_string().contains("thread 3"));
    }
}
