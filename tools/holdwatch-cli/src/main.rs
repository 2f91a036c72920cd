//! Holdwatch CLI: phone and tap-to-pay usage analysis over detection streams.
//!
//! Usage:
//!   holdwatch analyze <DETECTIONS>   Run the usage engine and write a report
//!   holdwatch validate <DETECTIONS>  Check a detection stream for problems
//!   holdwatch info <REPORT>          Show a saved usage report
//!   holdwatch init-config            Write the default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use holdwatch_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "holdwatch",
    about = "Detect when phones and tap-to-pay devices are held, and for how long",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the usage engine over a detection stream
    Analyze {
        /// Path to the detections JSONL file
        path: PathBuf,

        #[command(flatten)]
        overrides: commands::analyze::AnalyzeOverrides,

        /// Time holds with processing wall-clock time instead of frame timestamps
        #[arg(long)]
        wall_clock_timer: bool,

        /// Report output path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip writing the report
        #[arg(long)]
        no_report: bool,
    },

    /// Validate a detection stream
    Validate {
        /// Path to the detections JSONL file
        path: PathBuf,
    },

    /// Show a saved usage report
    Info {
        /// Path to the report JSON file
        path: PathBuf,

        /// Print the per-frame records as well
        #[arg(long)]
        frames: bool,
    },

    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match (&cli.config, &cli.command) {
        (_, Commands::InitConfig { .. }) => AppConfig::default(),
        (Some(path), _) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        (None, _) => AppConfig::load(),
    };

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    holdwatch_common::logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Analyze {
            path,
            overrides,
            wall_clock_timer,
            report,
            no_report,
        } => commands::analyze::run(
            path,
            &config,
            overrides,
            wall_clock_timer,
            report,
            no_report,
        ),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Info { path, frames } => commands::info::run(path, frames),
        Commands::InitConfig { force } => commands::init_config::run(cli.config, force),
    }
}
