//! Phase-accumulator oscillator and waveform generation.
//!
//! One oscillator per voice. Sine comes from the shared
//! [`SineTable`](tonada_core::SineTable); square, sawtooth, and triangle
//! are computed directly from the phase; noise comes from a per-voice
//! Galois LFSR so the sequence is deterministic and independent of the
//! other voices.

use tonada_core::SineTable;

/// Waveform selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// Wavetable sine (default).
    #[default]
    Sine,
    /// Full-scale square, high for the first half of the cycle.
    Square,
    /// Rising ramp across the cycle.
    Sawtooth,
    /// Linear rise then fall.
    Triangle,
    /// LFSR noise; ignores phase.
    Noise,
}

/// 32-bit Galois linear-feedback shift register.
///
/// Feedback taps at bit positions 0, 2, 22, and 31. Deterministic: from
/// [`SEED`](NoiseLfsr::SEED), N steps always produce the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseLfsr {
    state: u32,
}

impl Default for NoiseLfsr {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseLfsr {
    /// Initial register value.
    pub const SEED: u32 = 0xACE1;

    /// Create a register loaded with [`SEED`](Self::SEED).
    pub fn new() -> Self {
        Self { state: Self::SEED }
    }

    /// Step the register and fold the low 16 bits into a signed sample.
    #[inline]
    pub fn next(&mut self) -> i16 {
        let s = self.state;
        let bit = (s ^ (s >> 2) ^ (s >> 22) ^ (s >> 31)) & 1;
        self.state = (s >> 1) | (bit << 31);
        ((self.state & 0xFFFF) as i32 - 32768) as i16
    }
}

/// Single-voice oscillator.
///
/// Holds the phase accumulator in [0.0, 1.0) and the per-sample
/// increment `frequency / sample_rate`. Vibrato scales the increment per
/// call without touching the base frequency.
#[derive(Debug, Clone, Default)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    phase_inc: f32,
    lfsr: NoiseLfsr,
}

impl Oscillator {
    /// Create an oscillator at phase 0 with no frequency set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the oscillation frequency.
    pub fn set_frequency(&mut self, freq_hz: f32, sample_rate: f32) {
        self.phase_inc = freq_hz / sample_rate;
    }

    /// Restart the cycle at phase 0.
    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    /// Set the waveform.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Get the current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce the sample at the current phase, then advance.
    ///
    /// `vibrato` is a pitch-multiplier offset: the effective increment is
    /// `phase_inc * (1 + vibrato)` when non-zero.
    #[inline]
    pub fn advance(&mut self, table: &SineTable, vibrato: f32) -> i16 {
        let phase_inc = if vibrato != 0.0 {
            self.phase_inc * (1.0 + vibrato)
        } else {
            self.phase_inc
        };

        let sample = match self.waveform {
            Waveform::Sine => table.lookup(self.phase),
            Waveform::Square => {
                if self.phase < 0.5 {
                    32767
                } else {
                    -32767
                }
            }
            Waveform::Sawtooth => ((self.phase * 2.0 - 1.0) * 32767.0) as i16,
            Waveform::Triangle => {
                let v = if self.phase < 0.5 {
                    self.phase * 4.0 - 1.0
                } else {
                    3.0 - self.phase * 4.0
                };
                (v * 32767.0) as i16
            }
            Waveform::Noise => self.lfsr.next(),
        };

        self.phase += phase_inc;
        while self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfsr_deterministic() {
        let mut a = NoiseLfsr::new();
        let mut b = NoiseLfsr::new();
        for _ in 0..10_000 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_lfsr_known_first_step() {
        // seed 0xACE1: bit = (1 ^ 0 ^ 0 ^ 0) & 1 = 1 (bits 0=1, 2=0, 22=0, 31=0)
        // state -> (0xACE1 >> 1) | (1 << 31) = 0x80005670
        let mut lfsr = NoiseLfsr::new();
        let first = lfsr.next();
        assert_eq!(first, (0x5670i32 - 32768) as i16);
    }

    #[test]
    fn test_lfsr_not_constant() {
        let mut lfsr = NoiseLfsr::new();
        let first = lfsr.next();
        let mut saw_difference = false;
        for _ in 0..100 {
            if lfsr.next() != first {
                saw_difference = true;
                break;
            }
        }
        assert!(saw_difference);
    }

    #[test]
    fn test_square_halves() {
        let table = SineTable::new();
        let mut osc = Oscillator::new();
        osc.set_waveform(Waveform::Square);
        osc.set_frequency(1.0, 8.0); // 8 samples per cycle
        let expected = [32767, 32767, 32767, 32767, -32767, -32767, -32767, -32767];
        for (i, &want) in expected.iter().enumerate() {
            assert_eq!(osc.advance(&table, 0.0), want, "sample {i}");
        }
    }

    #[test]
    fn test_sawtooth_ramp() {
        let table = SineTable::new();
        let mut osc = Oscillator::new();
        osc.set_waveform(Waveform::Sawtooth);
        osc.set_frequency(1.0, 4.0);
        assert_eq!(osc.advance(&table, 0.0), -32767);
        let mid = osc.advance(&table, 0.0); // phase 0.25 -> -0.5 full scale
        assert!((mid as i32 + 16384).abs() < 32, "quarter-ramp was {mid}");
        assert_eq!(osc.advance(&table, 0.0), 0); // phase 0.5
    }

    #[test]
    fn test_triangle_extremes() {
        let table = SineTable::new();
        let mut osc = Oscillator::new();
        osc.set_waveform(Waveform::Triangle);
        osc.set_frequency(1.0, 4.0);
        assert_eq!(osc.advance(&table, 0.0), -32767); // phase 0
        assert_eq!(osc.advance(&table, 0.0), 0); // phase 0.25
        assert_eq!(osc.advance(&table, 0.0), 32767); // phase 0.5
        assert_eq!(osc.advance(&table, 0.0), 0); // phase 0.75
    }

    #[test]
    fn test_sine_uses_table() {
        let table = SineTable::new();
        let mut osc = Oscillator::new();
        osc.set_frequency(1.0, 4.0);
        assert_eq!(osc.advance(&table, 0.0), table.lookup(0.0));
        assert_eq!(osc.advance(&table, 0.0), table.lookup(0.25));
    }

    #[test]
    fn test_vibrato_shifts_pitch() {
        let table = SineTable::new();
        let mut plain = Oscillator::new();
        let mut modulated = Oscillator::new();
        for osc in [&mut plain, &mut modulated] {
            osc.set_waveform(Waveform::Sawtooth);
            osc.set_frequency(100.0, 22050.0);
        }
        // Positive vibrato advances phase faster, so the ramp runs ahead
        let mut last_plain = 0;
        let mut last_mod = 0;
        for _ in 0..50 {
            last_plain = plain.advance(&table, 0.0);
            last_mod = modulated.advance(&table, 0.02);
        }
        assert!(last_mod > last_plain);
    }

    #[test]
    fn test_phase_wraps() {
        let table = SineTable::new();
        let mut osc = Oscillator::new();
        osc.set_waveform(Waveform::Sawtooth);
        osc.set_frequency(440.0, 22050.0);
        for _ in 0..100_000 {
            let v = osc.advance(&table, 0.0);
            assert!(v >= -32767);
        }
    }
}
