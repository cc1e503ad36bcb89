//! Live melody playback command.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Args;
use tonada_config::{BackendKind, Profile};
use tonada_io::{AudioEngine, OutputStream, StreamConfig};
use tonada_synth::RELEASE_SAMPLES;

use super::common::{CliWaveform, load_profile};
use crate::melody;

/// Poll interval of the wait loop, in milliseconds.
const TICK_MS: u64 = 25;

#[derive(Args)]
pub struct PlayArgs {
    /// Melody file (JSON); plays the built-in demo melody if omitted
    #[arg(value_name = "MELODY")]
    melody: Option<PathBuf>,

    /// Profile name or path
    #[arg(short, long)]
    profile: Option<String>,

    /// Override the profile's waveform
    #[arg(short, long, value_enum)]
    waveform: Option<CliWaveform>,

    /// Output device (index, exact name, or partial name)
    #[arg(short, long)]
    device: Option<String>,

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

    /// Repeat the melody until interrupted
    #[arg(short, long, alias = "repeat")]
    r#loop: bool,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let mut profile = match &args.profile {
        Some(name) => load_profile(name)?,
        None => Profile::new("default"),
    };
    apply_overrides(&mut profile, &args);

    if profile.backend.kind == BackendKind::Poll {
        tracing::warn!(
            "profile selects the poll backend, which is driven by an embedding \
             control loop; playing through the stream backend instead"
        );
    }

    let notes = match &args.melody {
        Some(path) => melody::load_melody(path)?,
        None => melody::demo_melody(),
    };
    let cycle_ms = melody::total_ms(&notes);
    let tail_ms = u64::from(RELEASE_SAMPLES) * 1000 / u64::from(profile.sample_rate);

    println!(
        "Playing {} ({} steps, {:.1}s{})",
        args.melody
            .as_ref()
            .map_or_else(|| "demo melody".to_string(), |p| p.display().to_string()),
        notes.len(),
        cycle_ms as f64 / 1000.0,
        if args.r#loop { ", looping" } else { "" }
    );
    println!("  Profile: {}", profile.name);
    println!("  Sample rate: {} Hz", profile.sample_rate);
    println!(
        "  Buffer: {} frames x {}",
        profile.backend.buffer_size, profile.backend.num_buffers
    );
    println!(
        "  Output: {}",
        profile.backend.device.as_deref().unwrap_or("default device")
    );
    println!("\nPress Ctrl+C to stop...\n");

    // Ctrl+C flips the flag; the wait loop below notices and stops.
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    let (engine, controller) = AudioEngine::from_profile(&profile);
    controller.play_melody(&notes);

    let config = StreamConfig::from(&profile);
    let mut stream = OutputStream::start(engine, &config)?;

    let mut elapsed_ms = 0u64;
    while running.load(Ordering::SeqCst) && stream.is_running() {
        std::thread::sleep(Duration::from_millis(TICK_MS));
        elapsed_ms += TICK_MS;
        if args.r#loop {
            if elapsed_ms >= cycle_ms {
                controller.play_melody(&notes);
                elapsed_ms = 0;
            }
        } else if elapsed_ms >= cycle_ms + tail_ms {
            break;
        }
    }

    controller.stop_melody();
    stream.stop();

    let underruns = stream.underruns();
    if underruns > 0 {
        println!("Done ({underruns} underrun(s)).");
    } else {
        println!("Done!");
    }
    Ok(())
}

/// Fold the command-line overrides into the profile before the engine
/// is built from it.
fn apply_overrides(profile: &mut Profile, args: &PlayArgs) {
    if let Some(waveform) = args.waveform {
        profile.waveform = waveform.into();
    }
    if args.device.is_some() {
        profile.backend.device.clone_from(&args.device);
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
}
