//! Offline melody rendering command.

use std::path::PathBuf;

use clap::Args;
use tonada_config::Profile;
use tonada_io::{AudioEngine, write_wav};

use super::common::{CliWaveform, load_profile};
use crate::melody;

#[derive(Args)]
pub struct RenderArgs {
    /// Melody file (JSON); renders the built-in demo melody if omitted
    #[arg(value_name = "MELODY")]
    melody: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Profile name or path
    #[arg(short, long)]
    profile: Option<String>,

    /// Override the profile's waveform
    #[arg(short, long, value_enum)]
    waveform: Option<CliWaveform>,

    /// Enable the filter stage
    #[arg(long)]
    filter: bool,

    /// Enable the EQ stage
    #[arg(long)]
    eq: bool,

    /// Enable the reverb stage
    #[arg(long)]
    reverb: bool,

    /// Enable the echo stage
    #[arg(long)]
    echo: bool,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut profile = match &args.profile {
        Some(name) => load_profile(name)?,
        None => Profile::new("default"),
    };
    if let Some(waveform) = args.waveform {
        profile.waveform = waveform.into();
    }
    if args.filter {
        profile.filter.enabled = true;
    }
    if args.eq {
        profile.eq.enabled = true;
    }
    if args.reverb {
        profile.reverb.enabled = true;
    }
    if args.echo {
        profile.delay.enabled = true;
    }

    let notes = match &args.melody {
        Some(path) => melody::load_melody(path)?,
        None => melody::demo_melody(),
    };

    println!(
        "Rendering {} ({} steps, {:.1}s)...",
        args.melody
            .as_ref()
            .map_or_else(|| "demo melody".to_string(), |p| p.display().to_string()),
        notes.len(),
        melody::total_ms(&notes) as f64 / 1000.0
    );
    println!("  Profile: {}", profile.name);
    println!("  Sample rate: {} Hz", profile.sample_rate);

    let (mut engine, _controller) = AudioEngine::from_profile(&profile);
    let samples = engine.render_melody(&notes);
    write_wav(&args.output, &samples, profile.sample_rate)?;

    println!(
        "Wrote {} samples ({:.2}s) to {}",
        samples.len(),
        samples.len() as f64 / f64::from(profile.sample_rate),
        args.output.display()
    );
    Ok(())
}
