//! chordsynth CLI - real-time and offline wavetable chord synthesis.

mod commands;
mod status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chordsynth")]
#[command(author, version, about = "Wavetable chord synthesizer", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults to the user config file if present.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in real time on an output device
    Play(commands::play::PlayArgs),

    /// Render offline to a WAV file
    Render(commands::render::RenderArgs),

    /// List the chord and progression library
    Chords(commands::chords::ChordsArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the status line and listings own stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Play(args) => commands::play::run(args, config_path),
        Commands::Render(args) => commands::render::run(args, config_path),
        Commands::Chords(args) => commands::chords::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Config(args) => commands::config::run(args, config_path),
    }
}
