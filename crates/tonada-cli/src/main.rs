//! tonada CLI - command-line interface for the tonada synthesizer.

mod commands;
mod melody;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tonada")]
#[command(author, version, about = "Polyphonic wavetable synthesizer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a melody live through an output device
    Play(commands::play::PlayArgs),

    /// Render a melody to a WAV file
    Render(commands::render::RenderArgs),

    /// List available audio output devices
    Devices(commands::devices::DevicesArgs),

    /// List and manage profiles
    Profiles(commands::profiles::ProfilesArgs),
}

fn main() -> anyhow::Result<()> {
    // User-facing output goes through println; tracing stays quiet
    // unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Profiles(args) => commands::profiles::run(args),
    }
}
