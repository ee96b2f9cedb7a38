// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-session")]
#[command(about = "Event-driven camera session controller")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session against the simulated camera
    Simulate {
        /// Session configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seconds to record before stopping
        #[arg(short, long, default_value = "3")]
        duration: u64,

        /// Save the final state into this directory
        #[arg(short, long)]
        state_dir: Option<PathBuf>,
    },

    /// Print the orientation-to-rotation table
    Rotation,

    /// Print the persisted session slots
    Inspect {
        /// State directory (default: user data directory)
        #[arg(short, long)]
        state_dir: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camera_session=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            duration,
            state_dir,
        } => cli::simulate(config, duration, state_dir),
        Commands::Rotation => cli::print_rotation_table(),
        Commands::Inspect { state_dir } => cli::inspect(state_dir),
    }
}
