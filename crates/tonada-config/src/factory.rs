//! Factory profiles bundled with the library.
//!
//! Always available without touching the filesystem; `tonada profiles
//! init` copies them into the user directory as editable starting
//! points.

use crate::profile::{LfoShapeKind, Profile, WaveformKind};

/// Names of the built-in profiles.
pub static FACTORY_PROFILE_NAMES: &[&str] = &["default", "ambient", "chip"];

/// Whether a name refers to a factory profile.
pub fn is_factory_profile(name: &str) -> bool {
    FACTORY_PROFILE_NAMES.contains(&name)
}

/// Get a factory profile by name.
pub fn factory_profile(name: &str) -> Option<Profile> {
    match name {
        "default" => Some(default_profile()),
        "ambient" => Some(ambient_profile()),
        "chip" => Some(chip_profile()),
        _ => None,
    }
}

/// All factory profiles, in name order.
pub fn factory_profiles() -> Vec<Profile> {
    FACTORY_PROFILE_NAMES
        .iter()
        .filter_map(|name| factory_profile(name))
        .collect()
}

/// Everything at the reference settings; nothing enabled.
fn default_profile() -> Profile {
    Profile::new("default").with_description("Reference settings, no effects")
}

/// Washy pad: slow vibrato, large dark room, long echo.
fn ambient_profile() -> Profile {
    let mut profile =
        Profile::new("ambient").with_description("Slow vibrato into a large dark room");
    profile.waveform = WaveformKind::Triangle;
    profile.lfo.enabled = true;
    profile.lfo.vibrato = true;
    profile.lfo.rate_hz = 0.8;
    profile.lfo.depth = 30;
    profile.lfo.shape = LfoShapeKind::Sine;
    profile.reverb.enabled = true;
    profile.reverb.room_size = 0.85;
    profile.reverb.damping = 0.7;
    profile.reverb.wet = 0.45;
    profile.delay.enabled = true;
    profile.delay.time_ms = 420;
    profile.delay.feedback = 55;
    profile.delay.mix = 25;
    profile
}

/// Console-era lead: square wave, fast shallow vibrato, slapback.
fn chip_profile() -> Profile {
    let mut profile = Profile::new("chip").with_description("Square lead with slapback echo");
    profile.waveform = WaveformKind::Square;
    profile.voices = 3;
    profile.lfo.enabled = true;
    profile.lfo.vibrato = true;
    profile.lfo.rate_hz = 7.0;
    profile.lfo.depth = 15;
    profile.delay.enabled = true;
    profile.delay.time_ms = 90;
    profile.delay.feedback = 20;
    profile.delay.mix = 35;
    profile.eq.enabled = true;
    profile.eq.high_db = 3;
    profile
}
