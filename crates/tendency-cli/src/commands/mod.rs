pub mod analyze;
pub mod run;
pub mod variants;

use std::path::Path;

use tendency_core::{ExperimentConfig, ExperimentError, Variant};

/// Exit code for configuration mistakes.
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the OS entropy source fails.
pub const EXIT_ENTROPY: i32 = 3;
/// Exit code after Ctrl+C.
pub const EXIT_CANCELLED: i32 = 130;

/// Which variants a `run` invocation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSelection {
    One(Variant),
    Both,
}

impl VariantSelection {
    pub fn variants(self) -> Vec<Variant> {
        match self {
            Self::One(v) => vec![v],
            Self::Both => Variant::ALL.to_vec(),
        }
    }
}

/// Parse a variant selection string into the enum.
pub fn parse_variant_selection(s: &str) -> Result<VariantSelection, ExperimentError> {
    if s.eq_ignore_ascii_case("both") {
        return Ok(VariantSelection::Both);
    }
    s.parse().map(VariantSelection::One)
}

/// Parse a comma-separated list of array sizes.
pub fn parse_sizes(s: &str) -> Result<Vec<usize>, ExperimentError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>().map_err(|_| ExperimentError::InvalidConfiguration {
                field: "array_sizes",
                reason: format!("'{part}' is not a non-negative integer"),
            })
        })
        .collect()
}

/// Flag overrides layered on top of defaults or a config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides<'a> {
    pub config_path: Option<&'a str>,
    pub sizes: Option<&'a str>,
    pub iterations: Option<usize>,
    pub repetitions: Option<usize>,
    pub variant: Option<&'a str>,
    pub upper_bound: Option<u64>,
}

/// Resolve defaults → config file → flags into one validated config plus the
/// variants to run.
///
/// With no `--variant` flag a config file's variant wins; with neither, both
/// variants run.
pub fn build_config(
    overrides: &ConfigOverrides<'_>,
) -> Result<(ExperimentConfig, VariantSelection), ExperimentError> {
    let mut config = match overrides.config_path {
        Some(path) => ExperimentConfig::from_json_file(Path::new(path))?,
        None => ExperimentConfig::default(),
    };

    if let Some(sizes) = overrides.sizes {
        config.array_sizes = parse_sizes(sizes)?;
    }
    if let Some(iterations) = overrides.iterations {
        config.iterations_per_trial = iterations;
    }
    if let Some(repetitions) = overrides.repetitions {
        config.repetitions = repetitions;
    }
    if let Some(bound) = overrides.upper_bound {
        config.random_fill_upper_bound = bound;
    }

    let selection = match (overrides.variant, overrides.config_path) {
        (Some(s), _) => parse_variant_selection(s)?,
        (None, Some(_)) => VariantSelection::One(config.variant),
        (None, None) => VariantSelection::Both,
    };
    if let VariantSelection::One(v) = selection {
        config.variant = v;
    }

    config.validate()?;
    Ok((config, selection))
}

pub fn exit_code(err: &ExperimentError) -> i32 {
    match err {
        ExperimentError::InvalidConfiguration { .. } => EXIT_CONFIG,
        ExperimentError::EntropyUnavailable(_) => EXIT_ENTROPY,
        ExperimentError::Cancelled { .. } => EXIT_CANCELLED,
    }
}

/// Print `err` and exit with its code.
pub fn fail(err: &ExperimentError) -> ! {
    match err {
        ExperimentError::InvalidConfiguration { .. } => eprintln!("Configuration error: {err}"),
        ExperimentError::EntropyUnavailable(_) => {
            eprintln!("Entropy error: {err}");
            eprintln!("No results were produced; the OS entropy source must be available.");
        }
        ExperimentError::Cancelled { .. } => {
            eprintln!("\nInterrupted: {err}. Partial results are discarded.")
        }
    }
    std::process::exit(exit_code(err));
}
