//! Comb filter for the Schroeder reverb.
//!
//! A feedback comb with one-pole lowpass damping in the feedback path.
//! High frequencies die faster than lows, the way they do in a real
//! room.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::collections::TryReserveError;
use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Comb filter with feedback and damping.
///
/// The delay length equals the buffer length: each position is read,
/// then overwritten with the new feedback value, then the cursor
/// advances. An impulse fed in with zero feedback and zero damping
/// reappears exactly `len()` samples later.
///
/// # Example
///
/// ```rust
/// use tonada_core::CombFilter;
///
/// let mut comb = CombFilter::new(1116);
/// comb.set_feedback(0.8);
/// comb.set_damp(0.5);
///
/// let output = comb.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    pos: usize,
    feedback: f32,
    damp1: f32,
    damp2: f32,
    filterstore: f32,
}

impl CombFilter {
    /// Create a comb filter with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self::with_buffer(vec![0.0; delay_samples.max(1)])
    }

    /// Fallible variant of [`new`](Self::new): reports allocation
    /// failure instead of aborting, so an enable request can be refused
    /// cleanly.
    pub fn try_new(delay_samples: usize) -> Result<Self, TryReserveError> {
        let len = delay_samples.max(1);
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(len)?;
        buffer.resize(len, 0.0);
        Ok(Self::with_buffer(buffer))
    }

    fn with_buffer(buffer: Vec<f32>) -> Self {
        Self {
            buffer,
            pos: 0,
            feedback: 0.5,
            damp1: 0.5,
            damp2: 0.5,
            filterstore: 0.0,
        }
    }

    /// Set the feedback amount. Clamped to 0.0-0.99; higher values give
    /// longer decay times.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// Get the current feedback value.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the damping amount (0.0 = bright, 1.0 = dark). Clamped.
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp1 = damp.clamp(0.0, 1.0);
        self.damp2 = 1.0 - self.damp1;
    }

    /// Get the current damping value.
    #[inline]
    pub fn damp(&self) -> f32 {
        self.damp1
    }

    /// Process one sample. The output is the delayed signal; the input
    /// plus lowpass-filtered feedback replaces it in the buffer.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.pos];

        // One-pole lowpass in the feedback path:
        // filterstore = output * (1 - damp) + filterstore * damp
        self.filterstore = flush_denormal(output * self.damp2 + self.filterstore * self.damp1);

        self.buffer[self.pos] = input + self.filterstore * self.feedback;

        self.pos += 1;
        if self.pos >= self.buffer.len() {
            self.pos = 0;
        }

        output
    }

    /// Zero the buffer and the damping filter state.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.filterstore = 0.0;
        self.pos = 0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; the buffer is at least one sample long.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_delayed_by_len() {
        let mut comb = CombFilter::new(50);
        comb.set_feedback(0.0);
        comb.set_damp(0.0);

        let mut outputs = Vec::new();
        outputs.push(comb.process(1.0));
        for _ in 0..120 {
            outputs.push(comb.process(0.0));
        }

        for (i, &y) in outputs.iter().enumerate() {
            if i == 50 {
                assert!((y - 1.0).abs() < 1e-6, "impulse missing at delay length");
            } else {
                assert!(y.abs() < 1e-6, "unexpected output {y} at {i}");
            }
        }
    }

    #[test]
    fn test_feedback_produces_decaying_echoes() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(0.5);
        comb.set_damp(0.0);

        comb.process(1.0);
        let mut echoes = Vec::new();
        for i in 1..50 {
            let y = comb.process(0.0);
            if i % 10 == 0 {
                echoes.push(y);
            }
        }
        assert!((echoes[0] - 1.0).abs() < 1e-6);
        assert!((echoes[1] - 0.5).abs() < 1e-6);
        assert!((echoes[2] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_damping_attenuates_feedback() {
        let run = |damp: f32| {
            let mut comb = CombFilter::new(10);
            comb.set_feedback(0.9);
            comb.set_damp(damp);
            comb.process(1.0);
            let mut energy = 0.0;
            for _ in 0..500 {
                let y = comb.process(0.0);
                energy += y * y;
            }
            energy
        };
        assert!(run(0.9) < run(0.0), "damping failed to reduce tail energy");
    }

    #[test]
    fn test_zero_length_rounds_up() {
        let mut comb = CombFilter::new(0);
        assert_eq!(comb.len(), 1);
        comb.process(1.0);
    }

    #[test]
    fn test_try_new_matches_new() {
        let comb = CombFilter::try_new(100).unwrap();
        assert_eq!(comb.len(), 100);
    }

    #[test]
    fn test_clear() {
        let mut comb = CombFilter::new(8);
        comb.set_feedback(0.9);
        for _ in 0..20 {
            comb.process(1.0);
        }
        comb.clear();
        for _ in 0..20 {
            assert_eq!(comb.process(0.0), 0.0);
        }
    }
}
