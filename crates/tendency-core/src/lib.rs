//! # tendency-core
//!
//! **Does a fair coin leave a trace in the bookkeeping?**
//!
//! `tendency-core` runs a repeated randomized experiment. An array is hit,
//! step after step, by one of two transformations (reset to zero, or fill
//! with random values), picked by a bit from the OS entropy source. Every
//! step moves a signed *tendency* counter by ±1. Per-trial tendencies are
//! summed across several array sizes, many such sums are collected, and the
//! resulting distribution is scored by its normalized Shannon entropy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tendency_core::{ExperimentConfig, ExperimentRunner, Variant};
//!
//! let config = ExperimentConfig {
//!     repetitions: 100,
//!     ..Default::default()
//! };
//!
//! let mut runner = ExperimentRunner::os();
//! let batch = runner.run_experiment(&config).unwrap();
//! let report = batch.analyze();
//! println!("{report}");
//!
//! // The mirrored variant swaps which operation raises the tendency.
//! let alt = runner.run_experiment(&config.with_variant(Variant::Alt)).unwrap();
//! assert_eq!(alt.len(), 100);
//! ```
//!
//! ## Architecture
//!
//! RandomBitSource → Variant → TrialEngine → ExperimentRunner → analyze
//!
//! The library performs no I/O. Progress is reported through a callback and
//! the full [`ExperimentBatch`] is returned for plotting or storage by the
//! caller.

pub mod analysis;
pub mod bits;
pub mod config;
pub mod error;
pub mod runner;
pub mod trial;
pub mod variant;

pub use analysis::{InformationContentReport, ValueFrequency, analyze};
pub use bits::{OsBitSource, RandomBitSource, ScriptedBitSource};
pub use config::ExperimentConfig;
pub use error::ExperimentError;
pub use runner::{ExperimentBatch, ExperimentRunner, RepetitionProgress, run_experiment};
pub use trial::TrialEngine;
pub use variant::{DEFAULT_FILL_UPPER_BOUND, Operation, Variant};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
