//! RepSense CLI: batch analysis, live replay, and synthetic frame streams.
//!
//! Usage:
//!   repsense analyze <FRAMES.jsonl>   Run a recorded stream in batch mode
//!   repsense live <FRAMES.jsonl>      Replay a stream through the live tracker
//!   repsense synth <OUT.jsonl>        Write a synthetic workout stream
//!   repsense config                   Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use repsense_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "repsense",
    about = "Exercise metrics from pose landmarks: sit-ups, jump height, posture",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recorded frame stream in one pass
    Analyze {
        /// Path to the JSONL frame stream
        path: PathBuf,

        /// Print the session summary as JSON
        #[arg(long)]
        json: bool,

        /// The user's hip-to-ankle length in centimeters
        #[arg(long)]
        user_cm: Option<f64>,
    },

    /// Replay a frame stream through the live tracker
    Live {
        /// Path to the JSONL frame stream
        path: PathBuf,

        /// Pace playback at the stream's recorded fps
        #[arg(long)]
        realtime: bool,

        /// How often to poll the shared metrics (milliseconds)
        #[arg(long, default_value = "100")]
        poll_ms: u64,

        /// The user's hip-to-ankle length in centimeters
        #[arg(long)]
        user_cm: Option<f64>,
    },

    /// Write a synthetic workout frame stream
    Synth {
        /// Output file path
        output: PathBuf,

        /// Sit-up repetitions to generate
        #[arg(long, default_value = "5")]
        situps: u32,

        /// Jumps to generate
        #[arg(long, default_value = "2")]
        jumps: u32,

        /// Hip rise at the apex of each jump (pixels at 1280x720)
        #[arg(long, default_value = "80", value_parser = clap::value_parser!(u32).range(1..300))]
        jump_px: u32,
    },

    /// Show the effective configuration
    Config {
        /// Save the effective configuration to the standard location
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.log_json {
        config.logging.json = true;
    }
    repsense_common::logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Analyze {
            path,
            json,
            user_cm,
        } => {
            commands::apply_user_cm(&mut config, user_cm)?;
            commands::analyze::run(path, json, &config)
        }
        Commands::Live {
            path,
            realtime,
            poll_ms,
            user_cm,
        } => {
            commands::apply_user_cm(&mut config, user_cm)?;
            commands::live::run(path, realtime, poll_ms, &config).await
        }
        Commands::Synth {
            output,
            situps,
            jumps,
            jump_px,
        } => commands::synth::run(output, situps, jumps, jump_px),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
