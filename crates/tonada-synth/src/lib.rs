//! Tonada Synth - the voice layer of the tonada synthesis engine
//!
//! This crate provides the per-note synthesis machinery: envelopes,
//! oscillators, the polyphonic voice bank, and the melody sequencer that
//! drives it.
//!
//! # Core Components
//!
//! ## Envelope
//!
//! A fixed-timing integer envelope generator:
//!
//! - [`Envelope`] - 5-state machine (off/attack/decay/sustain/release)
//!   with an output level in 0-255
//! - [`EnvelopeState`] - stage tracking
//!
//! ```rust
//! use tonada_synth::Envelope;
//!
//! let mut env = Envelope::new();
//! env.gate_on();
//! let level = env.advance(); // 0-255
//! ```
//!
//! ## Oscillator
//!
//! - [`Oscillator`] - phase-accumulator oscillator over a shared sine
//!   table
//! - [`Waveform`] - closed waveform set (Sine, Square, Sawtooth,
//!   Triangle, Noise)
//! - [`NoiseLfsr`] - the deterministic 32-bit Galois LFSR behind the
//!   noise waveform
//!
//! ## Voices
//!
//! - [`Voice`] - one sounding note (oscillator + envelope + velocity)
//! - [`VoiceBank`] - fixed pool of [`MAX_VOICES`] voices with free-slot
//!   allocation and slot-0 stealing
//! - [`midi_to_freq`] - standard MIDI-to-Hz conversion
//!
//! ```rust
//! use tonada_core::SineTable;
//! use tonada_synth::VoiceBank;
//!
//! let table = SineTable::new();
//! let mut bank = VoiceBank::new(4);
//! bank.note_on(69, 127, 22050.0); // A4
//! let (sum, active) = bank.render(&table, 0.0, 1.0);
//! # let _ = (sum, active);
//! ```
//!
//! ## Melody
//!
//! - [`Note`] / [`MelodyPlayer`] - timed note sequences played against a
//!   [`VoiceBank`]; the player owns a private copy of the sequence
//! - [`pitches`] - MIDI note number constants
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (with `alloc` for the melody
//! copy). Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! tonada-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod envelope;
pub mod melody;
pub mod oscillator;
pub mod voice;

// Re-export main types at crate root
pub use envelope::{
    ATTACK_SAMPLES, DECAY_SAMPLES, Envelope, EnvelopeState, RELEASE_SAMPLES, SUSTAIN_LEVEL,
};
pub use melody::{MelodyPlayer, Note, REST, pitches};
pub use oscillator::{NoiseLfsr, Oscillator, Waveform};
pub use voice::{MAX_VOICES, Voice, VoiceBank, midi_to_freq};

// Re-export commonly used types from tonada-core
pub use tonada_core::{SineTable, WAVETABLE_SIZE};
