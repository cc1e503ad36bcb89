//! Property-based tests for tonada-core DSP primitives.
//!
//! Covers filter stability over the documented parameter ranges, the
//! zero-gain identity of the peaking biquad, comb delay integrity, and
//! the output ranges of the LFO and blend helpers.

use proptest::prelude::*;
use tonada_core::{
    AllpassFilter, Biquad, CombFilter, Lfo, LfoWaveform, StateVariableFilter, SvfOutput,
    peaking_coefficients, wet_dry_mix,
};

const SR: f32 = 22050.0;

/// The three simultaneous SVF outputs, indexed 0..3.
fn svf_mode(index: usize) -> SvfOutput {
    match index % 3 {
        0 => SvfOutput::Lowpass,
        1 => SvfOutput::Highpass,
        _ => SvfOutput::Bandpass,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Inside the unconditionally stable region (`f·(f + 2q) < 4` holds
    /// for every resonance once the cutoff stays below ~4.6 kHz at the
    /// reference rate), the SVF output is finite in every mode.
    #[test]
    fn svf_stability(
        cutoff in 20.0f32..4000.0,
        resonance in 0.0f32..0.99,
        mode in 0usize..3,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut svf = StateVariableFilter::new(SR);
        svf.set_cutoff(cutoff);
        svf.set_resonance(resonance);
        svf.set_output(svf_mode(mode));

        for &x in &input {
            let y = svf.process(x);
            prop_assert!(
                y.is_finite(),
                "SVF {:?} (cutoff={}, resonance={}) produced {}",
                svf_mode(mode), cutoff, resonance, y
            );
        }
    }

    /// Peaking sections are stable for any in-band center frequency,
    /// quality factor, and gain within the EQ's ±12 dB range.
    #[test]
    fn peaking_biquad_stability(
        freq in 20.0f32..10_000.0,
        q in 0.1f32..10.0,
        gain_db in -12.0f32..=12.0,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(peaking_coefficients(freq, q, gain_db, SR));

        for &x in &input {
            let y = biquad.process(x);
            prop_assert!(
                y.is_finite(),
                "peaking (freq={}, q={}, gain={}) produced {}",
                freq, q, gain_db, y
            );
        }
    }

    /// At 0 dB the peaking numerator and denominator coincide, so the
    /// section passes any signal through unchanged.
    #[test]
    fn peaking_zero_gain_identity(
        freq in 20.0f32..10_000.0,
        q in 0.1f32..10.0,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(peaking_coefficients(freq, q, 0.0, SR));

        for &x in &input {
            let y = biquad.process(x);
            prop_assert!(
                (y - x).abs() < 1e-3,
                "identity violated at freq={}, q={}: {} vs {}",
                freq, q, y, x
            );
        }
    }

    /// With feedback and damping off, a comb is a pure delay: the
    /// impulse reappears exactly `len` samples later and nowhere else.
    #[test]
    fn comb_delay_integrity(delay in 1usize..=300) {
        let mut comb = CombFilter::new(delay);
        comb.set_feedback(0.0);
        comb.set_damp(0.0);

        let mut outputs = vec![comb.process(1.0)];
        for _ in 0..delay * 2 {
            outputs.push(comb.process(0.0));
        }
        for (i, &y) in outputs.iter().enumerate() {
            if i == delay {
                prop_assert!((y - 1.0).abs() < 1e-6, "impulse missing at {}", i);
            } else {
                prop_assert!(y.abs() < 1e-6, "stray output {} at {}", y, i);
            }
        }
    }

    /// Comb output never exceeds the geometric series bound of its
    /// feedback coefficient.
    #[test]
    fn comb_boundedness(
        delay in 1usize..=100,
        feedback in 0.0f32..=0.99,
        damp in 0.0f32..=1.0,
        input in prop::collection::vec(-1.0f32..=1.0f32, 256),
    ) {
        let mut comb = CombFilter::new(delay);
        comb.set_feedback(feedback);
        comb.set_damp(damp);

        for &x in &input {
            let y = comb.process(x);
            prop_assert!(y.abs() <= 100.5, "comb output {} out of bound", y);
        }
    }

    /// Allpass diffusion at coefficient 0.5 keeps unit-range input
    /// within a fixed small bound.
    #[test]
    fn allpass_boundedness(
        delay in 1usize..=100,
        input in prop::collection::vec(-1.0f32..=1.0f32, 256),
    ) {
        let mut allpass = AllpassFilter::new(delay);
        for &x in &input {
            let y = allpass.process(x);
            prop_assert!(y.abs() <= 3.001, "allpass output {} out of bound", y);
        }
    }

    /// Both LFO shapes stay inside [-1, 1] at any rate in the engine's
    /// range.
    #[test]
    fn lfo_range(rate in 0.1f32..=20.0, shape in 0usize..2) {
        let mut lfo = Lfo::new(SR, rate);
        if shape == 1 {
            lfo.set_waveform(LfoWaveform::Triangle);
        }
        for _ in 0..1024 {
            let v = lfo.next();
            prop_assert!((-1.0..=1.0).contains(&v), "LFO value {} at rate {}", v, rate);
        }
    }

    /// The crossfade is a convex blend: the result never leaves the
    /// interval spanned by its endpoints (beyond float rounding).
    #[test]
    fn wet_dry_mix_within_hull(
        dry in -10_000.0f32..=10_000.0,
        wet in -10_000.0f32..=10_000.0,
        mix in 0.0f32..=1.0,
    ) {
        let y = wet_dry_mix(dry, wet, mix);
        let lo = dry.min(wet) - 0.01;
        let hi = dry.max(wet) + 0.01;
        prop_assert!((lo..=hi).contains(&y), "blend {} left [{}, {}]", y, lo, hi);
    }
}
