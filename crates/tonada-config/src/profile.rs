//! Profile file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// A named, persistable snapshot of every engine setting.
///
/// Profiles are stored as TOML files. Every field except `name` has a
/// default, so a profile only needs to spell out what it changes.
///
/// # TOML Format
///
/// ```toml
/// name = "warm"
/// description = "Mellow pad with a short echo"
/// sample_rate = 22050
/// voices = 4
/// volume = 200
/// waveform = "sine"
///
/// [backend]
/// kind = "stream"
/// buffer_size = 128
/// num_buffers = 4
///
/// [filter]
/// enabled = true
/// mode = "lowpass"
/// cutoff_hz = 800.0
/// resonance = 0.2
///
/// [delay]
/// enabled = true
/// time_ms = 250
/// feedback = 50
/// mix = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Name of the profile.
    pub name: String,

    /// Optional description of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Polyphony pool size.
    #[serde(default = "default_voices")]
    pub voices: usize,

    /// Master volume, 0–255.
    #[serde(default = "default_volume")]
    pub volume: u8,

    /// Oscillator waveform for all voices.
    #[serde(default)]
    pub waveform: WaveformKind,

    /// Output scheduling backend.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Filter stage settings.
    #[serde(default)]
    pub filter: FilterConfig,

    /// EQ stage settings.
    #[serde(default)]
    pub eq: EqConfig,

    /// Reverb stage settings.
    #[serde(default)]
    pub reverb: ReverbConfig,

    /// Delay/echo stage settings.
    #[serde(default)]
    pub delay: DelayConfig,

    /// Low-frequency oscillator settings.
    #[serde(default)]
    pub lfo: LfoConfig,
}

fn default_sample_rate() -> u32 {
    22050
}

fn default_voices() -> usize {
    4
}

fn default_volume() -> u8 {
    200
}

/// Oscillator waveform, as the profile file spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformKind {
    /// Wavetable sine.
    #[default]
    Sine,
    /// Square wave.
    Square,
    /// Rising sawtooth.
    Sawtooth,
    /// Triangle wave.
    Triangle,
    /// LFSR noise.
    Noise,
}

impl From<WaveformKind> for tonada_synth::Waveform {
    fn from(kind: WaveformKind) -> Self {
        match kind {
            WaveformKind::Sine => Self::Sine,
            WaveformKind::Square => Self::Square,
            WaveformKind::Sawtooth => Self::Sawtooth,
            WaveformKind::Triangle => Self::Triangle,
            WaveformKind::Noise => Self::Noise,
        }
    }
}

/// Filter output selection, as the profile file spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterModeKind {
    /// Low-pass output.
    #[default]
    Lowpass,
    /// High-pass output.
    Highpass,
    /// Band-pass output.
    Bandpass,
}

impl From<FilterModeKind> for tonada_core::SvfOutput {
    fn from(kind: FilterModeKind) -> Self {
        match kind {
            FilterModeKind::Lowpass => Self::Lowpass,
            FilterModeKind::Highpass => Self::Highpass,
            FilterModeKind::Bandpass => Self::Bandpass,
        }
    }
}

/// LFO shape, as the profile file spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LfoShapeKind {
    /// Sine shape.
    #[default]
    Sine,
    /// Triangle shape.
    Triangle,
}

impl From<LfoShapeKind> for tonada_core::LfoWaveform {
    fn from(kind: LfoShapeKind) -> Self {
        match kind {
            LfoShapeKind::Sine => Self::Sine,
            LfoShapeKind::Triangle => Self::Triangle,
        }
    }
}

/// Which real-time scheduling model drives the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Render thread feeding a bounded block queue drained by the
    /// audio device callback.
    #[default]
    Stream,
    /// Caller-driven polling, at most one sample per call.
    Poll,
}

/// Output backend settings. The stream fields are ignored by the poll
/// backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Scheduling model.
    pub kind: BackendKind,
    /// Frames per rendered block (stream backend).
    pub buffer_size: u32,
    /// Blocks the queue holds before the renderer is backpressured
    /// (stream backend).
    pub num_buffers: u32,
    /// Output device name; `None` picks the system default (stream
    /// backend).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Stream,
            buffer_size: 128,
            num_buffers: 4,
            device: None,
        }
    }
}

/// Filter stage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Whether the stage runs.
    pub enabled: bool,
    /// Which output the filter produces.
    pub mode: FilterModeKind,
    /// Cutoff frequency in Hz.
    pub cutoff_hz: f32,
    /// Resonance, 0.0–0.99.
    pub resonance: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: FilterModeKind::Lowpass,
            cutoff_hz: 1000.0,
            resonance: 0.1,
        }
    }
}

/// EQ stage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EqConfig {
    /// Whether the stage runs.
    pub enabled: bool,
    /// Bass band gain in dB.
    pub low_db: i8,
    /// Mid band gain in dB.
    pub mid_db: i8,
    /// Treble band gain in dB.
    pub high_db: i8,
}

/// Reverb stage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReverbConfig {
    /// Whether the stage runs.
    pub enabled: bool,
    /// Room size, 0.0–1.0.
    pub room_size: f32,
    /// High-frequency damping, 0.0–1.0.
    pub damping: f32,
    /// Wet mix, 0.0–1.0.
    pub wet: f32,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            room_size: 0.5,
            damping: 0.5,
            wet: 0.33,
        }
    }
}

/// Delay/echo stage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DelayConfig {
    /// Whether the stage runs.
    pub enabled: bool,
    /// Delay time in milliseconds.
    pub time_ms: u16,
    /// Feedback percentage, 0–90.
    pub feedback: u8,
    /// Dry/wet mix percentage, 0–100.
    pub mix: u8,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            time_ms: 250,
            feedback: 50,
            mix: 30,
        }
    }
}

/// Low-frequency oscillator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LfoConfig {
    /// Whether the LFO runs at all.
    pub enabled: bool,
    /// Route the LFO to pitch.
    pub vibrato: bool,
    /// Route the LFO to amplitude.
    pub tremolo: bool,
    /// Oscillation rate in Hz, 0.1–20.
    pub rate_hz: f32,
    /// Modulation depth percentage, 0–100.
    pub depth: u8,
    /// Oscillation shape.
    pub shape: LfoShapeKind,
}

impl Default for LfoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            vibrato: false,
            tremolo: false,
            rate_hz: 5.0,
            depth: 20,
            shape: LfoShapeKind::Sine,
        }
    }
}

impl Profile {
    /// Create a profile with the given name and every setting at its
    /// default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            voices: default_voices(),
            volume: default_volume(),
            waveform: WaveformKind::default(),
            backend: BackendConfig::default(),
            filter: FilterConfig::default(),
            eq: EqConfig::default(),
            reverb: ReverbConfig::default(),
            delay: DelayConfig::default(),
            lfo: LfoConfig::default(),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let profile: Profile = toml::from_str(&content)?;
        Ok(profile)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the profile to a TOML file, creating parent directories as
    /// needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new("untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_new_uses_reference_defaults() {
        let profile = Profile::new("test");
        assert_eq!(profile.name, "test");
        assert_eq!(profile.sample_rate, 22050);
        assert_eq!(profile.voices, 4);
        assert_eq!(profile.volume, 200);
        assert_eq!(profile.waveform, WaveformKind::Sine);
        assert_eq!(profile.backend.kind, BackendKind::Stream);
        assert_eq!(profile.backend.buffer_size, 128);
        assert_eq!(profile.backend.num_buffers, 4);
        assert!(!profile.filter.enabled);
        assert_eq!(profile.filter.cutoff_hz, 1000.0);
        assert_eq!(profile.delay.time_ms, 250);
        assert_eq!(profile.reverb.wet, 0.33);
        assert_eq!(profile.lfo.rate_hz, 5.0);
        assert_eq!(profile.lfo.depth, 20);
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let profile = Profile::from_toml("name = \"bare\"").unwrap();
        assert_eq!(profile.name, "bare");
        assert_eq!(profile.sample_rate, 22050);
        assert_eq!(profile.eq, EqConfig::default());
        assert_eq!(profile.delay.feedback, 50);
    }

    #[test]
    fn test_partial_table_fills_remaining_fields() {
        let toml = r#"
name = "partial"

[filter]
enabled = true
cutoff_hz = 500.0
"#;
        let profile = Profile::from_toml(toml).unwrap();
        assert!(profile.filter.enabled);
        assert_eq!(profile.filter.cutoff_hz, 500.0);
        // Unspecified fields of the same table keep their defaults
        assert_eq!(profile.filter.resonance, 0.1);
        assert_eq!(profile.filter.mode, FilterModeKind::Lowpass);
    }

    #[test]
    fn test_enum_spellings() {
        let toml = r#"
name = "shapes"
waveform = "sawtooth"

[filter]
mode = "bandpass"

[lfo]
shape = "triangle"

[backend]
kind = "poll"
"#;
        let profile = Profile::from_toml(toml).unwrap();
        assert_eq!(profile.waveform, WaveformKind::Sawtooth);
        assert_eq!(profile.filter.mode, FilterModeKind::Bandpass);
        assert_eq!(profile.lfo.shape, LfoShapeKind::Triangle);
        assert_eq!(profile.backend.kind, BackendKind::Poll);
    }

    #[test]
    fn test_unknown_waveform_is_a_parse_error() {
        let toml = "name = \"bad\"\nwaveform = \"organ\"";
        assert!(matches!(
            Profile::from_toml(toml),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_roundtrip_preserves_profile() {
        let mut original = Profile::new("roundtrip").with_description("all knobs moved");
        original.sample_rate = 44100;
        original.voices = 8;
        original.waveform = WaveformKind::Noise;
        original.filter.enabled = true;
        original.filter.mode = FilterModeKind::Highpass;
        original.eq.low_db = -6;
        original.reverb.enabled = true;
        original.reverb.room_size = 0.9;
        original.delay.time_ms = 125;
        original.lfo.enabled = true;
        original.lfo.tremolo = true;
        original.backend.device = Some("hw:1".to_string());

        let toml = original.to_toml().unwrap();
        let parsed = Profile::from_toml(&toml).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prof.toml");

        let mut profile = Profile::new("disk");
        profile.delay.enabled = true;
        profile.save(&path).unwrap();

        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Profile::load("/definitely/not/here.toml").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("not/here.toml"), "got: {msg}");
    }

    #[test]
    fn test_waveform_conversion() {
        use tonada_synth::Waveform;
        assert_eq!(Waveform::from(WaveformKind::Square), Waveform::Square);
        assert_eq!(Waveform::from(WaveformKind::Noise), Waveform::Noise);
    }

    #[test]
    fn test_filter_mode_conversion() {
        use tonada_core::SvfOutput;
        assert_eq!(SvfOutput::from(FilterModeKind::Highpass), SvfOutput::Highpass);
    }
}
