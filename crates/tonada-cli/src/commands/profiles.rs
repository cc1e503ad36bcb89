//! Profile management commands.
//!
//! Lists factory and user profiles, shows the full settings of one,
//! and copies factory profiles into the user directory for editing.

use clap::{Args, Subcommand};
use tonada_config::{
    BackendKind, FACTORY_PROFILE_NAMES, FilterModeKind, LfoConfig, LfoShapeKind, Profile,
    WaveformKind, ensure_user_dir, factory_profile, factory_profiles, find_profile,
    is_factory_profile, list_profiles, user_profiles_dir,
};

use super::common::load_profile;

#[derive(Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    command: ProfilesCommand,
}

#[derive(Subcommand)]
enum ProfilesCommand {
    /// List available profiles (factory and user)
    List {
        /// Show only factory profiles
        #[arg(long)]
        factory: bool,

        /// Show only user profiles
        #[arg(long)]
        user: bool,
    },

    /// Show the full settings of a profile
    Show {
        /// Profile name or path
        name: String,
    },

    /// Copy a factory profile into the user directory for editing
    Init {
        /// Factory profile to start from
        #[arg(default_value = "default")]
        source: String,

        /// Name for the new profile (source name if omitted)
        #[arg(short, long)]
        name: Option<String>,
    },
}

pub fn run(args: ProfilesArgs) -> anyhow::Result<()> {
    match args.command {
        ProfilesCommand::List { factory, user } => list(factory, user),
        ProfilesCommand::Show { name } => show(&name),
        ProfilesCommand::Init { source, name } => init(&source, name.as_deref()),
    }
}

fn list(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    let show_factory = !user_only;
    let show_user = !factory_only;

    if show_factory {
        println!("Factory Profiles");
        println!("================");
        for profile in factory_profiles() {
            println!(
                "  {:12} - {}",
                profile.name,
                profile.description.as_deref().unwrap_or("")
            );
        }
        println!();
    }

    if show_user {
        println!("User Profiles ({})", user_profiles_dir().display());
        println!("=============");
        let names = list_profiles();
        if names.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create one with: tonada profiles init ambient --name my-pad");
        } else {
            for name in names {
                match find_profile(&name).map(|path| Profile::load(&path)) {
                    Some(Ok(profile)) => println!(
                        "  {:12} - {}",
                        name,
                        profile.description.as_deref().unwrap_or("")
                    ),
                    _ => println!("  {name:12} - (error loading)"),
                }
            }
        }
        println!();
    }

    Ok(())
}

fn show(name: &str) -> anyhow::Result<()> {
    // load_profile normalizes, so the values printed here are the ones
    // the engine actually runs with.
    let profile = load_profile(name)?;

    println!("Profile: {}", profile.name);
    println!("{}", "=".repeat(9 + profile.name.len()));
    println!();

    if let Some(desc) = &profile.description {
        println!("{desc}");
        println!();
    }

    println!("Sample rate: {} Hz", profile.sample_rate);
    println!("Voices:      {}", profile.voices);
    println!("Volume:      {}", profile.volume);
    println!("Waveform:    {}", waveform_label(profile.waveform));
    match profile.backend.kind {
        BackendKind::Stream => println!(
            "Backend:     stream, {} frames x {}, {}",
            profile.backend.buffer_size,
            profile.backend.num_buffers,
            profile.backend.device.as_deref().unwrap_or("default device"),
        ),
        BackendKind::Poll => println!("Backend:     poll"),
    }
    println!();

    println!("Stages:");
    println!(
        "  filter {}  {} @ {:.0} Hz, resonance {:.2}",
        onoff(profile.filter.enabled),
        mode_label(profile.filter.mode),
        profile.filter.cutoff_hz,
        profile.filter.resonance,
    );
    println!(
        "  eq     {}  low {:+} dB, mid {:+} dB, high {:+} dB",
        onoff(profile.eq.enabled),
        profile.eq.low_db,
        profile.eq.mid_db,
        profile.eq.high_db,
    );
    println!(
        "  reverb {}  room {:.2}, damping {:.2}, wet {:.2}",
        onoff(profile.reverb.enabled),
        profile.reverb.room_size,
        profile.reverb.damping,
        profile.reverb.wet,
    );
    println!(
        "  echo   {}  {} ms, feedback {}%, mix {}%",
        onoff(profile.delay.enabled),
        profile.delay.time_ms,
        profile.delay.feedback,
        profile.delay.mix,
    );
    println!(
        "  lfo    {}  {} {:.1} Hz, depth {}%{}",
        onoff(profile.lfo.enabled),
        shape_label(profile.lfo.shape),
        profile.lfo.rate_hz,
        profile.lfo.depth,
        routing_label(&profile.lfo),
    );

    Ok(())
}

fn init(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let mut profile = factory_profile(source).ok_or_else(|| {
        anyhow::anyhow!(
            "factory profile '{}' not found (available: {})",
            source,
            FACTORY_PROFILE_NAMES.join(", ")
        )
    })?;

    let target = new_name.unwrap_or(source);
    let dir = ensure_user_dir()?;
    let path = dir.join(format!("{target}.toml"));

    if path.exists() {
        anyhow::bail!(
            "profile '{}' already exists at {}. Choose a different name with --name.",
            target,
            path.display()
        );
    }

    profile.name = target.to_string();
    profile.save(&path)?;

    println!("Wrote profile '{}' to {}", target, path.display());
    if is_factory_profile(target) {
        println!(
            "Note: the factory profile '{target}' keeps priority when loading by name; \
             pass the file path to use your copy."
        );
    } else {
        println!("Edit it, then play with: tonada play --profile {target}");
    }
    Ok(())
}

fn onoff(enabled: bool) -> &'static str {
    if enabled { "ON " } else { "off" }
}

fn waveform_label(kind: WaveformKind) -> &'static str {
    match kind {
        WaveformKind::Sine => "sine",
        WaveformKind::Square => "square",
        WaveformKind::Sawtooth => "sawtooth",
        WaveformKind::Triangle => "triangle",
        WaveformKind::Noise => "noise",
    }
}

fn mode_label(kind: FilterModeKind) -> &'static str {
    match kind {
        FilterModeKind::Lowpass => "lowpass",
        FilterModeKind::Highpass => "highpass",
        FilterModeKind::Bandpass => "bandpass",
    }
}

fn shape_label(kind: LfoShapeKind) -> &'static str {
    match kind {
        LfoShapeKind::Sine => "sine",
        LfoShapeKind::Triangle => "triangle",
    }
}

fn routing_label(lfo: &LfoConfig) -> &'static str {
    match (lfo.vibrato, lfo.tremolo) {
        (true, true) => " -> vibrato + tremolo",
        (true, false) => " -> vibrato",
        (false, true) => " -> tremolo",
        (false, false) => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_cover_variants() {
        assert_eq!(waveform_label(WaveformKind::Sawtooth), "sawtooth");
        assert_eq!(mode_label(FilterModeKind::Bandpass), "bandpass");
        assert_eq!(shape_label(LfoShapeKind::Triangle), "triangle");
    }

    #[test]
    fn test_routing_label_combinations() {
        let mut lfo = LfoConfig::default();
        assert_eq!(routing_label(&lfo), "");
        lfo.vibrato = true;
        assert_eq!(routing_label(&lfo), " -> vibrato");
        lfo.tremolo = true;
        assert_eq!(routing_label(&lfo), " -> vibrato + tremolo");
    }

    #[test]
    fn test_show_factory_profile() {
        show("chip").unwrap();
    }

    #[test]
    fn test_init_unknown_source_is_an_error() {
        let err = init("no-such-factory", None).unwrap_err();
        assert!(err.to_string().contains("not found"), "got: {err}");
    }
}
