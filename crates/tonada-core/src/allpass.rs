//! Allpass filter for reverb diffusion.
//!
//! A Schroeder allpass passes all frequencies at equal amplitude while
//! smearing phase, turning the comb bank's discrete echoes into a dense
//! tail.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::collections::TryReserveError;
use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Schroeder allpass diffusor with a fixed 0.5 coefficient.
///
/// Structure per sample:
/// `output = -input + delayed; buffer <- input + delayed * 0.5`.
/// As with [`CombFilter`](crate::CombFilter), the delay length equals
/// the buffer length.
///
/// # Example
///
/// ```rust
/// use tonada_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(556);
/// let output = allpass.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    pos: usize,
}

impl AllpassFilter {
    /// Internal feedforward/feedback coefficient.
    pub const FEEDBACK: f32 = 0.5;

    /// Create an allpass with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            pos: 0,
        }
    }

    /// Fallible variant of [`new`](Self::new) for clean enable-request
    /// refusal on allocation failure.
    pub fn try_new(delay_samples: usize) -> Result<Self, TryReserveError> {
        let len = delay_samples.max(1);
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(len)?;
        buffer.resize(len, 0.0);
        Ok(Self { buffer, pos: 0 })
    }

    /// Process one sample through the diffusor.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let output = -input + delayed;

        self.buffer[self.pos] = flush_denormal(input + delayed * Self::FEEDBACK);

        self.pos += 1;
        if self.pos >= self.buffer.len() {
            self.pos = 0;
        }

        output
    }

    /// Zero the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
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
    fn test_impulse_response_shape() {
        let mut allpass = AllpassFilter::new(5);
        // t=0: buffer empty, output = -input
        assert!((allpass.process(1.0) + 1.0).abs() < 1e-6);
        for i in 1..5 {
            assert!(allpass.process(0.0).abs() < 1e-6, "early output at {i}");
        }
        // t=5: the stored input (1.0) emerges
        assert!((allpass.process(0.0) - 1.0).abs() < 1e-6);
        // t=10: second pass through at coefficient 0.5
        for _ in 6..10 {
            allpass.process(0.0);
        }
        assert!((allpass.process(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_output_stays_finite() {
        let mut allpass = AllpassFilter::new(41);
        for i in 0..10_000 {
            let x = if i % 7 == 0 { 1.0 } else { -0.3 };
            let y = allpass.process(x);
            assert!(y.is_finite());
            assert!(y.abs() < 10.0);
        }
    }

    #[test]
    fn test_clear() {
        let mut allpass = AllpassFilter::new(10);
        for _ in 0..30 {
            allpass.process(1.0);
        }
        allpass.clear();
        assert!((allpass.process(0.5) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_try_new_matches_new() {
        let allpass = AllpassFilter::try_new(441).unwrap();
        assert_eq!(allpass.len(), 441);
    }
}
