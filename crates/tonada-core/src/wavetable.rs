//! Precomputed sine wavetable.
//!
//! Sine generation via a lookup table with linear interpolation. On the
//! original hardware target a `sinf` call per voice per sample is
//! unaffordable; the table costs two loads and one multiply-add and is
//! accurate to better than 0.01% of full scale at 512 entries.

use libm::sinf;

/// Number of entries in the sine table. Power of two so the wrap is a
/// mask rather than a modulo.
pub const WAVETABLE_SIZE: usize = 512;

/// One cycle of a sine wave sampled into signed 16-bit values.
///
/// Built once at startup and shared by every voice; lookups never
/// mutate, so a single table serves the whole voice bank.
///
/// # Example
///
/// ```rust
/// use tonada_core::SineTable;
///
/// let table = SineTable::new();
/// assert_eq!(table.lookup(0.0), 0);
/// assert!(table.lookup(0.25) > 32000);
/// ```
#[derive(Debug, Clone)]
pub struct SineTable {
    samples: [i16; WAVETABLE_SIZE],
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SineTable {
    /// Generate the table. `samples[i] = sin(2π·i/N) · 32767`.
    pub fn new() -> Self {
        let mut samples = [0i16; WAVETABLE_SIZE];
        for (i, sample) in samples.iter_mut().enumerate() {
            let angle = 2.0 * core::f32::consts::PI * (i as f32) / (WAVETABLE_SIZE as f32);
            *sample = (sinf(angle) * 32767.0) as i16;
        }
        Self { samples }
    }

    /// Look up the sine value for a phase in [0.0, 1.0), linearly
    /// interpolating between the two nearest entries.
    ///
    /// Phases at or above 1.0 wrap; negative phases are not supported
    /// (oscillator phase accumulators only move forward).
    #[inline]
    pub fn lookup(&self, phase: f32) -> i16 {
        let position = phase * (WAVETABLE_SIZE as f32);
        let index = position as usize;
        let frac = position - (index as f32);
        let index = index & (WAVETABLE_SIZE - 1);
        let next = (index + 1) & (WAVETABLE_SIZE - 1);

        let a = self.samples[index] as f32;
        let b = self.samples[next] as f32;
        (a + (b - a) * frac) as i16
    }
}
