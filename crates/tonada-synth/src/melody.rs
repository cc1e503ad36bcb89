//! Sequenced melody playback.
//!
//! [`MelodyPlayer`] steps through a list of [`Note`]s against a
//! millisecond clock supplied by the caller, issuing note-on/note-off
//! to a [`VoiceBank`](crate::VoiceBank). It copies the sequence on
//! `play`, so the caller's buffer can be reused or freed immediately.
//!
//! Timing is millisecond-resolution: a note changes on the first
//! `update` call whose clock value is at or past the note boundary, so
//! actual durations quantize to the update cadence.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use crate::voice::VoiceBank;

/// Pitch value that plays silence for the note's duration.
pub const REST: u8 = 0;

/// One step in a melody: MIDI pitch, duration, velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// MIDI note number, or [`REST`] for silence.
    pub pitch: u8,
    /// How long the step lasts in milliseconds.
    pub duration_ms: u16,
    /// Note-on velocity (ignored for rests).
    pub velocity: u8,
}

impl Note {
    /// Create a note.
    pub const fn new(pitch: u8, duration_ms: u16, velocity: u8) -> Self {
        Self {
            pitch,
            duration_ms,
            velocity,
        }
    }

    /// Create a silent step.
    pub const fn rest(duration_ms: u16) -> Self {
        Self {
            pitch: REST,
            duration_ms,
            velocity: 0,
        }
    }

    /// Whether this step is silence.
    pub const fn is_rest(&self) -> bool {
        self.pitch == REST
    }
}

/// MIDI note numbers for writing melodies by name.
///
/// `S` in a name reads as "sharp": `CS4` is C#4. Octave numbers follow
/// the MIDI convention where C4 = 60 (middle C).
pub mod pitches {
    #![allow(missing_docs)]

    pub const C3: u8 = 48;
    pub const CS3: u8 = 49;
    pub const D3: u8 = 50;
    pub const DS3: u8 = 51;
    pub const E3: u8 = 52;
    pub const F3: u8 = 53;
    pub const FS3: u8 = 54;
    pub const G3: u8 = 55;
    pub const GS3: u8 = 56;
    pub const A3: u8 = 57;
    pub const AS3: u8 = 58;
    pub const B3: u8 = 59;

    pub const C4: u8 = 60;
    pub const CS4: u8 = 61;
    pub const D4: u8 = 62;
    pub const DS4: u8 = 63;
    pub const E4: u8 = 64;
    pub const F4: u8 = 65;
    pub const FS4: u8 = 66;
    pub const G4: u8 = 67;
    pub const GS4: u8 = 68;
    pub const A4: u8 = 69;
    pub const AS4: u8 = 70;
    pub const B4: u8 = 71;

    pub const C5: u8 = 72;
    pub const CS5: u8 = 73;
    pub const D5: u8 = 74;
    pub const DS5: u8 = 75;
    pub const E5: u8 = 76;
    pub const F5: u8 = 77;
    pub const FS5: u8 = 78;
    pub const G5: u8 = 79;
    pub const GS5: u8 = 80;
    pub const A5: u8 = 81;
    pub const AS5: u8 = 82;
    pub const B5: u8 = 83;

    pub const C6: u8 = 84;
}

/// Steps a copied note sequence against a caller-supplied clock.
#[derive(Debug, Clone, Default)]
pub struct MelodyPlayer {
    notes: Vec<Note>,
    current: usize,
    note_started_ms: u64,
    playing: bool,
}

impl MelodyPlayer {
    /// Create an idle player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a melody is in progress.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start a melody at clock time `now_ms`, replacing any melody in
    /// progress (its sounding notes are released first). An empty
    /// sequence leaves the player idle.
    pub fn play(&mut self, sequence: &[Note], now_ms: u64, bank: &mut VoiceBank, sample_rate: f32) {
        if self.playing {
            bank.all_notes_off();
        }
        self.notes.clear();
        self.playing = false;
        if sequence.is_empty() {
            return;
        }

        self.notes.extend_from_slice(sequence);
        self.current = 0;
        self.note_started_ms = now_ms;
        self.playing = true;

        let first = self.notes[0];
        if !first.is_rest() {
            bank.note_on(first.pitch, first.velocity, sample_rate);
        }
    }

    /// Advance the melody to clock time `now_ms`.
    ///
    /// Moves at most one step per call. When the current note's
    /// duration has elapsed it is released, the next note starts, and
    /// the step's start time snaps to `now_ms`. At the end of the
    /// sequence the player stops and releases everything.
    pub fn update(&mut self, now_ms: u64, bank: &mut VoiceBank, sample_rate: f32) {
        if !self.playing {
            return;
        }

        let note = self.notes[self.current];
        let elapsed = now_ms.saturating_sub(self.note_started_ms);
        if elapsed < u64::from(note.duration_ms) {
            return;
        }

        if !note.is_rest() {
            bank.note_off(note.pitch);
        }

        self.current += 1;
        if self.current >= self.notes.len() {
            self.stop(bank);
            return;
        }

        self.note_started_ms = now_ms;
        let next = self.notes[self.current];
        if !next.is_rest() {
            bank.note_on(next.pitch, next.velocity, sample_rate);
        }
    }

    /// Abort playback and release all sounding notes.
    pub fn stop(&mut self, bank: &mut VoiceBank) {
        self.playing = false;
        self.notes.clear();
        bank.all_notes_off();
    }
}
