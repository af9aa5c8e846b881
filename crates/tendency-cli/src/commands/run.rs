//! `tendency run` — run one or both variants and report.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::Serialize;
use tendency_core::{
    ExperimentBatch, ExperimentConfig, ExperimentRunner, InformationContentReport,
    RepetitionProgress, Variant,
};

use super::{ConfigOverrides, build_config, fail};

const BAR_WIDTH: usize = 30;

pub struct RunCommandConfig<'a> {
    pub config_path: Option<&'a str>,
    pub sizes: Option<&'a str>,
    pub iterations: Option<usize>,
    pub repetitions: Option<usize>,
    pub variant: Option<&'a str>,
    pub upper_bound: Option<u64>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct VariantOutcome {
    config: ExperimentConfig,
    elapsed_ms: u64,
    batch: ExperimentBatch,
    report: InformationContentReport,
}

#[derive(Serialize)]
struct JsonRunReport {
    version: &'static str,
    run_id: String,
    runs: Vec<VariantOutcome>,
}

pub fn run(cfg: RunCommandConfig<'_>) {
    let overrides = ConfigOverrides {
        config_path: cfg.config_path,
        sizes: cfg.sizes,
        iterations: cfg.iterations,
        repetitions: cfg.repetitions,
        variant: cfg.variant,
        upper_bound: cfg.upper_bound,
    };
    let (config, selection) = build_config(&overrides).unwrap_or_else(|e| fail(&e));

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log::warn!("Ctrl+C handler not installed: {e}");
    }

    if !cfg.json {
        println!(
            "Running {} repetition(s) over sizes {:?}, {} iterations per trial...\n",
            config.repetitions, config.array_sizes, config.iterations_per_trial
        );
    }

    let mut outcomes = Vec::new();
    for variant in selection.variants() {
        let variant_config = config.clone().with_variant(variant);
        let mut runner = ExperimentRunner::os().with_cancel_flag(Arc::clone(&cancel));
        let mut progress = ProgressLine::new(variant, cfg.quiet);

        let t0 = Instant::now();
        let batch = runner
            .run_experiment_with_progress(&variant_config, |p| progress.update(p))
            .unwrap_or_else(|e| fail(&e));
        let elapsed = t0.elapsed();
        progress.finish(elapsed.as_secs_f64());

        let report = batch.analyze();
        if !cfg.json {
            print_outcome(variant, &report);
        }
        outcomes.push(VariantOutcome {
            config: variant_config,
            elapsed_ms: elapsed.as_millis() as u64,
            batch,
            report,
        });
    }

    if cfg.json {
        let doc = JsonRunReport {
            version: tendency_core::VERSION,
            run_id: uuid::Uuid::new_v4().to_string(),
            runs: outcomes,
        };
        match serde_json::to_string_pretty(&doc) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn print_outcome(variant: Variant, report: &InformationContentReport) {
    println!("──────────────────── {variant} ────────────────────");
    println!("{report}");
    println!(
        "  Distinct values:                 {} of {} samples (σ = {:.4})",
        report.distinct_values, report.samples, report.std_dev
    );
    println!();
}

/// Single-line progress indicator on stderr, redrawn per repetition.
struct ProgressLine {
    label: Variant,
    quiet: bool,
}

impl ProgressLine {
    fn new(label: Variant, quiet: bool) -> Self {
        Self { label, quiet }
    }

    fn update(&mut self, p: &RepetitionProgress) {
        if self.quiet {
            return;
        }
        eprint!("\r{}", render_bar(self.label, p.completed, p.total));
        let _ = std::io::stderr().flush();
    }

    fn finish(&self, secs: f64) {
        if !self.quiet {
            eprintln!(" {secs:.1}s");
        }
    }
}

fn render_bar(label: Variant, completed: usize, total: usize) -> String {
    let filled = if total == 0 {
        BAR_WIDTH
    } else {
        completed * BAR_WIDTH / total
    };
    format!(
        "  {label:<9} [{}{}] {completed}/{total}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar_edges() {
        let empty = render_bar(Variant::Original, 0, 500);
        assert!(empty.contains(&"░".repeat(BAR_WIDTH)));
        assert!(empty.ends_with("0/500"));

        let full = render_bar(Variant::Alt, 500, 500);
        assert!(full.contains(&"█".repeat(BAR_WIDTH)));
        assert!(full.contains("alt"));
    }

    #[test]
    fn test_render_bar_halfway() {
        let half = render_bar(Variant::Original, 250, 500);
        assert_eq!(half.matches('█').count(), BAR_WIDTH / 2);
        assert_eq!(half.matches('░').count(), BAR_WIDTH - BAR_WIDTH / 2);
    }

    #[test]
    fn test_json_report_shape() {
        let config = ExperimentConfig {
            array_sizes: vec![4],
            iterations_per_trial: 2,
            repetitions: 3,
            ..Default::default()
        };
        let batch = ExperimentRunner::os().run_experiment(&config).unwrap();
        let report = batch.analyze();
        let doc = JsonRunReport {
            version: tendency_core::VERSION,
            run_id: "fixed".into(),
            runs: vec![VariantOutcome {
                config,
                elapsed_ms: 1,
                batch,
                report,
            }],
        };
        let value: serde_json::Value = serde_json::to_value(&doc).unwrap();
        let run = &value["runs"][0];
        assert_eq!(run["batch"]["variant"], "original");
        assert_eq!(run["batch"]["values"].as_array().unwrap().len(), 3);
        assert_eq!(run["config"]["repetitions"], 3);
        assert!(run["report"]["normalized_information_content"].is_number());
    }
}
