//! Shared CLI helpers used across multiple commands.

use clap::ValueEnum;
use tonada_config::{Profile, WaveformKind, factory_profile, find_profile, normalize};

/// Waveform names for the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliWaveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Noise,
}

impl From<CliWaveform> for WaveformKind {
    fn from(w: CliWaveform) -> Self {
        match w {
            CliWaveform::Sine => WaveformKind::Sine,
            CliWaveform::Square => WaveformKind::Square,
            CliWaveform::Sawtooth => WaveformKind::Sawtooth,
            CliWaveform::Triangle => WaveformKind::Triangle,
            CliWaveform::Noise => WaveformKind::Noise,
        }
    }
}

/// Load a profile by name or path and normalize it.
///
/// Searches factory profiles first, then the user profile directory
/// (`.toml` appended if missing), then direct file paths. Out-of-range
/// values are clamped to their documented bounds; each adjustment is
/// logged as a warning.
pub fn load_profile(name: &str) -> anyhow::Result<Profile> {
    let mut profile = if let Some(profile) = factory_profile(name) {
        profile
    } else if let Some(path) = find_profile(name) {
        Profile::load(&path)?
    } else {
        anyhow::bail!(
            "profile '{}' not found. Use 'tonada profiles list' to see available profiles.",
            name
        )
    };

    for adjustment in normalize(&mut profile) {
        tracing::warn!(profile = %profile.name, "out-of-range value clamped: {adjustment}");
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_profiles_resolve_by_name() {
        let profile = load_profile("ambient").unwrap();
        assert_eq!(profile.name, "ambient");
        assert!(profile.reverb.enabled);
    }

    #[test]
    fn test_direct_path_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "name = \"custom\"\nvoices = 99").unwrap();

        // Out-of-range voice count comes back clamped
        let profile = load_profile(path.to_str().unwrap()).unwrap();
        assert_eq!(profile.name, "custom");
        assert_eq!(profile.voices, tonada_synth::MAX_VOICES);
    }

    #[test]
    fn test_unknown_profile_is_an_error() {
        let err = load_profile("no-such-profile-xyz").unwrap_err();
        assert!(err.to_string().contains("not found"), "got: {err}");
    }

    #[test]
    fn test_waveform_conversion_covers_all() {
        assert_eq!(WaveformKind::from(CliWaveform::Sine), WaveformKind::Sine);
        assert_eq!(WaveformKind::from(CliWaveform::Noise), WaveformKind::Noise);
    }
}
