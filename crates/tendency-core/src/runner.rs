//! Multi-trial aggregation loop.
//!
//! One repetition runs a trial for every configured array size and sums the
//! final tendencies. An experiment collects one such sum per repetition into
//! an [`ExperimentBatch`]. Everything is sequential; the only suspension
//! point is the bit source.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use rand::rngs::ThreadRng;
use serde::Serialize;

use crate::analysis::{InformationContentReport, analyze};
use crate::bits::{OsBitSource, RandomBitSource};
use crate::config::ExperimentConfig;
use crate::error::ExperimentError;
use crate::trial::TrialEngine;
use crate::variant::Variant;

/// Upper limit on up-front allocation; larger batches grow on demand.
const MAX_PREALLOCATED_VALUES: usize = 1 << 16;

/// Ordered repetition sums of one experiment.
///
/// Order is kept so reports and plots can be reproduced; the analysis only
/// looks at the multiset of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentBatch {
    pub variant: Variant,
    pub expected_repetitions: usize,
    values: Vec<i64>,
}

impl ExperimentBatch {
    pub fn new(variant: Variant, expected_repetitions: usize) -> Self {
        Self {
            variant,
            expected_repetitions,
            values: Vec::with_capacity(expected_repetitions.min(MAX_PREALLOCATED_VALUES)),
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<i64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True once every configured repetition has contributed a sum.
    pub fn is_complete(&self) -> bool {
        self.values.len() == self.expected_repetitions
    }

    /// Sum of all repetition sums, widened so it cannot overflow.
    pub fn total(&self) -> i128 {
        self.values.iter().map(|&v| i128::from(v)).sum()
    }

    pub fn analyze(&self) -> InformationContentReport {
        analyze(&self.values)
    }

    fn push(&mut self, sum: i64) {
        self.values.push(sum);
    }
}

/// Emitted after each finished repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionProgress {
    /// Repetitions finished so far, including this one.
    pub completed: usize,
    pub total: usize,
    pub repetition_sum: i64,
}

/// Drives a [`TrialEngine`] over every `(repetition, size)` pair.
pub struct ExperimentRunner<B, R = ThreadRng> {
    engine: TrialEngine<B, R>,
    cancel: Option<Arc<AtomicBool>>,
}

impl ExperimentRunner<OsBitSource, ThreadRng> {
    /// Runner backed by the OS entropy source.
    pub fn os() -> Self {
        Self::new(TrialEngine::os())
    }
}

impl<B, R> ExperimentRunner<B, R> {
    pub fn new(engine: TrialEngine<B, R>) -> Self {
        Self {
            engine,
            cancel: None,
        }
    }

    /// Stop between trials once `flag` becomes true.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn engine(&self) -> &TrialEngine<B, R> {
        &self.engine
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

impl<B: RandomBitSource, R: Rng> ExperimentRunner<B, R> {
    pub fn run_experiment(
        &mut self,
        config: &ExperimentConfig,
    ) -> Result<ExperimentBatch, ExperimentError> {
        self.run_experiment_with_progress(config, |_| {})
    }

    /// Run the experiment, calling `on_progress` after every repetition.
    ///
    /// The configuration is validated before any bit is drawn. An entropy
    /// failure or a raised cancel flag aborts the run; no partial batch is
    /// returned.
    pub fn run_experiment_with_progress(
        &mut self,
        config: &ExperimentConfig,
        mut on_progress: impl FnMut(&RepetitionProgress),
    ) -> Result<ExperimentBatch, ExperimentError> {
        config.validate()?;
        self.engine
            .set_fill_upper_bound(config.random_fill_upper_bound);

        log::info!(
            "starting experiment: variant={} sizes={:?} iterations={} repetitions={}",
            config.variant,
            config.array_sizes,
            config.iterations_per_trial,
            config.repetitions
        );

        let mut batch = ExperimentBatch::new(config.variant, config.repetitions);
        for _ in 0..config.repetitions {
            let mut repetition_sum = 0i64;
            for &size in &config.array_sizes {
                if self.cancelled() {
                    log::warn!(
                        "experiment cancelled after {}/{} repetitions",
                        batch.len(),
                        config.repetitions
                    );
                    return Err(ExperimentError::Cancelled {
                        completed: batch.len(),
                        expected: config.repetitions,
                    });
                }
                repetition_sum +=
                    self.engine
                        .run_trial(size, config.iterations_per_trial, config.variant)?;
            }
            batch.push(repetition_sum);
            let progress = RepetitionProgress {
                completed: batch.len(),
                total: config.repetitions,
                repetition_sum,
            };
            log::debug!(
                "repetition {}/{} sum={}",
                progress.completed,
                progress.total,
                repetition_sum
            );
            on_progress(&progress);
        }

        log::info!(
            "experiment finished: variant={} total={} bits={}",
            config.variant,
            batch.total(),
            self.engine.bits().bits_consumed()
        );
        Ok(batch)
    }
}

/// Run `config` once against the OS entropy source.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentBatch, ExperimentError> {
    ExperimentRunner::os().run_experiment(config)
}
