//! Mathematical utility functions for DSP.
//!
//! Allocation-free helpers shared by the filter and reverb primitives,
//! suitable for `no_std`.

/// Flush denormal float values to zero.
///
/// Denormal (subnormal) floats are extremely slow on many CPUs. Feedback
/// paths (comb filters, biquad state) decay toward zero and would
/// otherwise spend thousands of samples in denormal territory after the
/// input goes silent.
///
/// # Example
/// ```rust
/// use tonada_core::flush_denormal;
///
/// assert_eq!(flush_denormal(1e-30), 0.0);
/// assert_eq!(flush_denormal(0.5), 0.5);
/// ```
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix` but uses one fewer
/// multiply: `dry + (wet - dry) * mix`.
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Wet fraction in [0.0, 1.0]
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}
