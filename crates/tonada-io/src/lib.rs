//! Real-time engine and audio I/O for tonada.
//!
//! This crate hosts the running side of the synthesizer: the
//! [`AudioEngine`] render loop that turns voice-bank output into a
//! finished mono sample stream, the [`EngineController`] command surface
//! that drives it from other threads, cpal device output, and WAV export
//! via hound.
//!
//! ## Scheduling models
//!
//! The same engine feeds two mutually exclusive delivery disciplines:
//!
//! - [`OutputStream`]: a dedicated render thread fills fixed-size
//!   blocks and pushes them into a bounded queue drained by the cpal
//!   output callback. The blocking push is the backpressure; callback
//!   underruns emit silence and bump a counter.
//! - [`AudioEngine::poll`]: a self-paced step function for callers
//!   that own their own loop. At most one sample is produced per call;
//!   late calls skip the periods they missed and surface the count
//!   through [`AudioEngine::missed_deadlines`].
//!
//! ## Example
//!
//! ```rust
//! use tonada_io::AudioEngine;
//!
//! let (mut engine, controller) = AudioEngine::new(22050);
//! controller.note_on(69, 127); // A4
//! let mut block = [0i16; 128];
//! engine.render_block(&mut block);
//! ```

use thiserror::Error;

/// Errors from engine control, device setup, and file I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// WAV encoding/decoding error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// No audio device available.
    #[error("no audio device available")]
    NoDevice,

    /// Requested audio device was not found.
    #[error("audio device not found: {0}")]
    DeviceNotFound(String),

    /// Buffer allocation for a delay-line effect failed; the effect
    /// stays disabled and the engine keeps running.
    #[error("allocation failed for the {0} buffer")]
    EffectAlloc(&'static str),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

mod engine;
mod params;
mod sink;
mod stream;
mod wav;

pub use engine::{AudioEngine, EngineController};
pub use sink::{BufferedPcm, MemorySink, PcmSource, SampleSink};
pub use stream::{AudioDevice, OutputStream, StreamConfig, default_output_device, list_devices};
pub use wav::{read_wav, write_wav};
