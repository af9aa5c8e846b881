//! Error type shared by every stage of the experiment.

use std::fmt;

/// Failure of an experiment run.
///
/// Configuration mistakes and entropy-source failures are kept apart so a
/// front end can report them differently. Neither is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    /// A configuration value is out of range.
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
    /// The random bit source could not produce a value.
    EntropyUnavailable(String),
    /// A cancel flag was raised between trials. No batch is produced.
    Cancelled { completed: usize, expected: usize },
}

impl ExperimentError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { field, reason } => {
                write!(f, "invalid configuration: {field}: {reason}")
            }
            Self::EntropyUnavailable(cause) => write!(f, "entropy source unavailable: {cause}"),
            Self::Cancelled {
                completed,
                expected,
            } => write!(
                f,
                "experiment cancelled after {completed}/{expected} repetitions"
            ),
        }
    }
}

impl std::error::Error for ExperimentError {}

impl From<getrandom::Error> for ExperimentError {
    fn from(err: getrandom::Error) -> Self {
        Self::EntropyUnavailable(err.to_string())
    }
}
