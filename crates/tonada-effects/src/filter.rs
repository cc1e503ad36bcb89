//! Chain-facing state-variable filter.
//!
//! Thin wrapper over [`StateVariableFilter`] that gives the chain an
//! [`Effect`] implementation. Parameter clamping and coefficient
//! handling live in the underlying filter.

use tonada_core::{Effect, StateVariableFilter, SvfOutput};

/// Selectable-mode filter stage.
///
/// # Example
///
/// ```rust
/// use tonada_core::{Effect, SvfOutput};
/// use tonada_effects::Filter;
///
/// let mut filter = Filter::new(22050.0);
/// filter.set_mode(SvfOutput::Highpass);
/// filter.set_cutoff(500.0);
/// let out = filter.process(0.25);
/// # let _ = out;
/// ```
#[derive(Debug, Clone)]
pub struct Filter {
    svf: StateVariableFilter,
}

impl Filter {
    /// Create a filter at the given sample rate (1 kHz lowpass,
    /// resonance 0.1).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            svf: StateVariableFilter::new(sample_rate),
        }
    }

    /// Set the cutoff frequency in Hz (clamped to 20–20000).
    ///
    /// Changing the cutoff clears filter state.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.svf.set_cutoff(cutoff_hz);
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.svf.cutoff()
    }

    /// Set the resonance (clamped to 0.0–0.99).
    ///
    /// Changing the resonance clears filter state.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.svf.set_resonance(resonance);
    }

    /// Current resonance.
    pub fn resonance(&self) -> f32 {
        self.svf.resonance()
    }

    /// Select which of the three simultaneous outputs is produced.
    pub fn set_mode(&mut self, mode: SvfOutput) {
        self.svf.set_output(mode);
    }

    /// Current output mode.
    pub fn mode(&self) -> SvfOutput {
        self.svf.output()
    }
}

impl Effect for Filter {
    fn process(&mut self, input: f32) -> f32 {
        self.svf.process(input)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.svf.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.svf.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = Filter::new(22050.0);
        filter.set_cutoff(1000.0);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = filter.process(1.0);
        }
        assert!((out - 1.0).abs() < 0.05, "DC through lowpass: {out}");
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut filter = Filter::new(22050.0);
        filter.set_mode(SvfOutput::Highpass);
        filter.set_cutoff(1000.0);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = filter.process(1.0);
        }
        assert!(out.abs() < 0.05, "DC through highpass: {out}");
    }

    #[test]
    fn test_mode_roundtrip() {
        let mut filter = Filter::new(22050.0);
        for mode in [SvfOutput::Lowpass, SvfOutput::Bandpass, SvfOutput::Highpass] {
            filter.set_mode(mode);
            assert_eq!(filter.mode(), mode);
        }
    }

    #[test]
    fn test_parameters_clamp() {
        let mut filter = Filter::new(22050.0);
        filter.set_cutoff(100_000.0);
        filter.set_resonance(5.0);
        assert!(filter.cutoff() <= 20000.0);
        assert!(filter.resonance() <= 0.99);
    }
}
