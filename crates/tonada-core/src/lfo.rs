//! Low Frequency Oscillator for modulation.
//!
//! Produces the control signal behind vibrato (pitch modulation) and
//! tremolo (amplitude modulation). Not itself audible.

use core::f32::consts::PI;
use libm::sinf;

/// LFO waveform shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Smooth sinusoidal modulation (default).
    #[default]
    Sine,
    /// Linear rise and fall; harder corners than sine.
    Triangle,
}

/// Low-frequency oscillator.
///
/// A phase accumulator advanced by `rate / sample_rate` per call. One
/// call to [`next`](Lfo::next) corresponds to exactly one audio sample,
/// so the LFO stays phase-locked to the synthesis clock.
///
/// ## Parameters
///
/// - `frequency`: modulation rate in Hz (the engine clamps to 0.1-20)
/// - `waveform`: [`LfoWaveform::Sine`] or [`LfoWaveform::Triangle`]
///
/// # Example
///
/// ```rust
/// use tonada_core::{Lfo, LfoWaveform};
///
/// let mut lfo = Lfo::new(22050.0, 5.0);
/// lfo.set_waveform(LfoWaveform::Triangle);
///
/// // Modulation values in [-1.0, 1.0]
/// let value = lfo.next();
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Waveform shape
    waveform: LfoWaveform,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(22050.0, 5.0)
    }
}

impl Lfo {
    /// Create a new LFO with the given sample rate and frequency.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
            waveform: LfoWaveform::Sine,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Get current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Update the sample rate, preserving the configured frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.frequency();
        self.sample_rate = sample_rate;
        self.phase_inc = freq / sample_rate;
    }

    /// Set waveform shape.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Get current waveform shape.
    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Get the value at the current phase and advance by one sample.
    ///
    /// Returns a value in [-1.0, 1.0].
    #[inline]
    pub fn next(&mut self) -> f32 {
        let output = match self.waveform {
            LfoWaveform::Sine => sinf(self.phase * 2.0 * PI),
            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }
}
