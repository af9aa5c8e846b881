//! Experiment configuration.
//!
//! Default parameters: array sizes `50 * 10 * i` for
//! `i` in `1, 51`, 50 iterations per trial, 500 repetitions, fill values up to
//! `i64::MAX`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;
use crate::variant::{DEFAULT_FILL_UPPER_BOUND, Variant};

pub const DEFAULT_ARRAY_SIZES: [usize; 2] = [500, 25_500];
pub const DEFAULT_ITERATIONS_PER_TRIAL: usize = 50;
pub const DEFAULT_REPETITIONS: usize = 500;

/// Parameters of one experiment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Array sizes visited, in order, by every repetition.
    pub array_sizes: Vec<usize>,
    pub iterations_per_trial: usize,
    pub repetitions: usize,
    pub variant: Variant,
    /// Inclusive upper bound for random fill values.
    pub random_fill_upper_bound: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            array_sizes: DEFAULT_ARRAY_SIZES.to_vec(),
            iterations_per_trial: DEFAULT_ITERATIONS_PER_TRIAL,
            repetitions: DEFAULT_REPETITIONS,
            variant: Variant::default(),
            random_fill_upper_bound: DEFAULT_FILL_UPPER_BOUND,
        }
    }
}

impl ExperimentConfig {
    /// Same parameters, different variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ExperimentError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ExperimentError::invalid("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ExperimentError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ExperimentError::invalid("config", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Reject values that would make the experiment meaningless.
    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.array_sizes.is_empty() {
            return Err(ExperimentError::invalid(
                "array_sizes",
                "at least one array size is required",
            ));
        }
        if let Some(pos) = self.array_sizes.iter().position(|&s| s == 0) {
            return Err(ExperimentError::invalid(
                "array_sizes",
                format!("size at position {pos} must be at least 1"),
            ));
        }
        if self.iterations_per_trial == 0 {
            return Err(ExperimentError::invalid(
                "iterations_per_trial",
                "must be at least 1",
            ));
        }
        if self.repetitions == 0 {
            return Err(ExperimentError::invalid("repetitions", "must be at least 1"));
        }
        if self.random_fill_upper_bound == 0 {
            return Err(ExperimentError::invalid(
                "random_fill_upper_bound",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Entropy bits a full run consumes.
    pub fn expected_bit_draws(&self) -> u64 {
        self.repetitions as u64 * self.iterations_per_trial as u64 * self.array_sizes.len() as u64
    }

    /// Largest possible `|repetition sum|`.
    pub fn max_abs_repetition_sum(&self) -> u64 {
        self.iterations_per_trial as u64 * self.array_sizes.len() as u64
    }
}
