//! Core Effect trait.
//!
//! The [`Effect`] trait is the common seam between the effect units and
//! the mixer stage. The mixer works in a signed-integer domain and
//! converts to `f32` at each enabled stage boundary, so effects here
//! process full-scale sample values (roughly ±32767), not normalized
//! audio.
//!
//! ## Design Decisions
//!
//! - **Mono processing**: the synthesis pipeline is mono until the final
//!   output formatting stage; stereo duplication happens at the sink.
//!
//! - **Object-safe**: the trait supports `dyn Effect` so the chain can
//!   sweep reset/sample-rate updates over heterogeneous stages without
//!   naming each type.
//!
//! - **No allocations**: all methods are called from real-time contexts.
//!   Anything that needs a buffer allocates at construction time.

/// Common interface for the effect units.
///
/// Effects process audio samples one at a time; block helpers are
/// provided for offline rendering and tests.
///
/// # Example
///
/// ```rust
/// use tonada_core::Effect;
///
/// struct Inverter;
///
/// impl Effect for Inverter {
///     fn process(&mut self, input: f32) -> f32 {
///         -input
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Process a single sample, advancing internal state by one tick.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls [`process`](Effect::process) per
    /// sample. `input` and `output` must have the same length.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in-place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate.
    ///
    /// Effects recalculate any rate-dependent coefficients (filter
    /// coefficients, delay lengths in samples, LFO increments).
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (delay contents, filter history) without
    /// changing parameters. Called when an effect is re-enabled so stale
    /// buffer contents never leak into the output.
    fn reset(&mut self);

    /// Processing latency in samples. All units here are zero-latency;
    /// the default returns 0.
    fn latency_samples(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain {
        gain: f32,
    }

    impl Effect for Gain {
        fn process(&mut self, input: f32) -> f32 {
            input * self.gain
        }

        fn set_sample_rate(&mut self, _sample_rate: f32) {}

        fn reset(&mut self) {}
    }

    #[test]
    fn test_process_block_default_impl() {
        let mut gain = Gain { gain: 2.0 };
        let input = [1.0, -2.0, 3.0];
        let mut output = [0.0; 3];
        gain.process_block(&input, &mut output);
        assert_eq!(output, [2.0, -4.0, 6.0]);
    }

    #[test]
    fn test_process_block_inplace_default_impl() {
        let mut gain = Gain { gain: 0.5 };
        let mut buffer = [4.0, -8.0];
        gain.process_block_inplace(&mut buffer);
        assert_eq!(buffer, [2.0, -4.0]);
    }

    #[test]
    fn test_object_safety() {
        let mut effects: [&mut dyn Effect; 1] = [&mut Gain { gain: 1.0 }];
        for effect in &mut effects {
            assert_eq!(effect.process(1.5), 1.5);
            assert_eq!(effect.latency_samples(), 0);
        }
    }
}
