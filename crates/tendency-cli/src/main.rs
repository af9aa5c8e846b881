//! CLI for tendency — does a fair coin leave a trace in the bookkeeping?

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tendency")]
#[command(about = "tendency — OS entropy drives reset/fill transformations; Shannon analysis of the outcome")]
#[command(version = tendency_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the experiment and print the information-content report.
    /// Without --variant (and without --config) both variants run, original first.
    Run {
        /// JSON config file; flags below override its fields
        #[arg(long)]
        config: Option<String>,

        /// Comma-separated array sizes visited by every repetition (e.g. "500,25500")
        #[arg(long)]
        sizes: Option<String>,

        /// Transformations per trial
        #[arg(long)]
        iterations: Option<usize>,

        /// Number of repetitions (one repetition sum each)
        #[arg(long)]
        repetitions: Option<usize>,

        /// Which delta assignment to run
        #[arg(long, value_parser = ["original", "alt", "both"])]
        variant: Option<String>,

        /// Inclusive upper bound for random fill values
        #[arg(long)]
        upper_bound: Option<u64>,

        /// Print the batch and report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Suppress the progress line on stderr
        #[arg(long)]
        quiet: bool,
    },

    /// Analyze integers (whitespace or comma separated) from a file or stdin
    Analyze {
        /// Input file; reads stdin when omitted
        input: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which operation raises and which lowers the tendency per variant
    Variants,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            sizes,
            iterations,
            repetitions,
            variant,
            upper_bound,
            json,
            quiet,
        } => commands::run::run(commands::run::RunCommandConfig {
            config_path: config.as_deref(),
            sizes: sizes.as_deref(),
            iterations,
            repetitions,
            variant: variant.as_deref(),
            upper_bound,
            json,
            quiet,
        }),
        Commands::Analyze { input, json } => commands::analyze::run(input.as_deref(), json),
        Commands::Variants => commands::variants::run(),
    }
}
