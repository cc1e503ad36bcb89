//! Melody file loading.
//!
//! A melody is a JSON array of steps played in order:
//!
//! ```json
//! [
//!   { "pitch": 60, "duration": 500, "velocity": 100 },
//!   { "pitch": 0,  "duration": 250 },
//!   { "pitch": 64 }
//! ]
//! ```
//!
//! `pitch` is a MIDI note number, 0 for a rest. `duration` defaults to
//! 500 ms, `velocity` to 127.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tonada_synth::{Note, pitches};

/// One melody step as spelled in the file.
#[derive(Debug, Deserialize)]
struct Step {
    pitch: u8,
    #[serde(default = "default_duration")]
    duration: u16,
    #[serde(default = "default_velocity")]
    velocity: u8,
}

fn default_duration() -> u16 {
    500
}

fn default_velocity() -> u8 {
    127
}

/// Load a melody from a JSON file.
pub fn load_melody(path: &Path) -> anyhow::Result<Vec<Note>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read melody file '{}'", path.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse melody file '{}'", path.display()))?;
    if steps.is_empty() {
        anyhow::bail!("melody file '{}' contains no steps", path.display());
    }
    Ok(steps
        .into_iter()
        .map(|step| Note::new(step.pitch, step.duration, step.velocity))
        .collect())
}

/// Built-in melody played when no file is given: a C-major arpeggio up
/// and back down with a breath in the middle.
pub fn demo_melody() -> Vec<Note> {
    vec![
        Note::new(pitches::C4, 250, 110),
        Note::new(pitches::E4, 250, 100),
        Note::new(pitches::G4, 250, 100),
        Note::new(pitches::C5, 400, 115),
        Note::rest(150),
        Note::new(pitches::G4, 250, 95),
        Note::new(pitches::E4, 250, 95),
        Note::new(pitches::C4, 600, 105),
    ]
}

/// Total playing time of a sequence in milliseconds.
pub fn total_ms(notes: &[Note]) -> u64 {
    notes.iter().map(|note| u64::from(note.duration_ms)).sum()
}
