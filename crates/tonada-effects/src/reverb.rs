//! Schroeder reverb.
//!
//! Four parallel comb filters with damped feedback feed two series
//! allpass diffusers. Small by modern reverb standards, but it is the
//! structure the engine is specified against, and it fits the memory
//! budget of the small targets this workspace started on.

use alloc::collections::TryReserveError;

use tonada_core::{AllpassFilter, CombFilter, Effect, wet_dry_mix};

/// Comb delay lengths in samples at the reference rate.
/// Mutually prime to avoid stacking resonances.
const COMB_TUNINGS: [usize; 4] = [1116, 1188, 1277, 1356];

/// Allpass delay lengths in samples at the reference rate.
const ALLPASS_TUNINGS: [usize; 2] = [556, 441];

/// Sample rate the tuning constants are quoted at.
const REFERENCE_RATE: f32 = 22050.0;

/// Scale a reference delay length to the target sample rate.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    ((samples as f32 * target_rate / REFERENCE_RATE + 0.5) as usize).max(1)
}

/// Schroeder reverb with room size, damping, and wet controls.
///
/// ## Parameters
///
/// - `room_size`: 0.0–1.0, maps to comb feedback `0.5 + size * 0.45`
/// - `damping`: 0.0–1.0, high-frequency absorption in the comb loops
/// - `wet`: 0.0–1.0, blend between dry input and reverb output
///
/// # Example
///
/// ```rust
/// use tonada_core::Effect;
/// use tonada_effects::Reverb;
///
/// let mut reverb = Reverb::new(22050.0);
/// reverb.set_room_size(0.8);
/// reverb.set_wet(0.5);
/// let out = reverb.process(0.5);
/// # let _ = out;
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
    room_size: f32,
    damping: f32,
    wet: f32,
    sample_rate: f32,
}

impl Reverb {
    /// Create a reverb at the given sample rate with default
    /// parameters (room 0.5, damping 0.5, wet 0.33).
    pub fn new(sample_rate: f32) -> Self {
        let combs =
            core::array::from_fn(|i| CombFilter::new(scale_to_rate(COMB_TUNINGS[i], sample_rate)));
        let allpasses = core::array::from_fn(|i| {
            AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS[i], sample_rate))
        });

        let mut reverb = Self {
            combs,
            allpasses,
            room_size: 0.5,
            damping: 0.5,
            wet: 0.33,
            sample_rate,
        };
        reverb.apply_parameters();
        reverb
    }

    /// Fallible constructor: reports buffer allocation failure instead
    /// of aborting, so an enable request can be refused cleanly.
    pub fn try_new(sample_rate: f32) -> Result<Self, TryReserveError> {
        let combs = [
            CombFilter::try_new(scale_to_rate(COMB_TUNINGS[0], sample_rate))?,
            CombFilter::try_new(scale_to_rate(COMB_TUNINGS[1], sample_rate))?,
            CombFilter::try_new(scale_to_rate(COMB_TUNINGS[2], sample_rate))?,
            CombFilter::try_new(scale_to_rate(COMB_TUNINGS[3], sample_rate))?,
        ];
        let allpasses = [
            AllpassFilter::try_new(scale_to_rate(ALLPASS_TUNINGS[0], sample_rate))?,
            AllpassFilter::try_new(scale_to_rate(ALLPASS_TUNINGS[1], sample_rate))?,
        ];

        let mut reverb = Self {
            combs,
            allpasses,
            room_size: 0.5,
            damping: 0.5,
            wet: 0.33,
            sample_rate,
        };
        reverb.apply_parameters();
        Ok(reverb)
    }

    /// Set the room size (clamped to 0.0–1.0).
    pub fn set_room_size(&mut self, size: f32) {
        self.room_size = size.clamp(0.0, 1.0);
        self.apply_parameters();
    }

    /// Current room size.
    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    /// Set the damping amount (clamped to 0.0–1.0). Zero is bright,
    /// one is dark.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
        self.apply_parameters();
    }

    /// Current damping.
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Set the wet mix (clamped to 0.0–1.0). Zero passes the input
    /// through untouched.
    pub fn set_wet(&mut self, wet: f32) {
        self.wet = wet.clamp(0.0, 1.0);
    }

    /// Current wet mix.
    pub fn wet(&self) -> f32 {
        self.wet
    }

    /// Push room size and damping into the comb loops.
    fn apply_parameters(&mut self) {
        let feedback = 0.5 + self.room_size * 0.45;
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
            comb.set_damp(self.damping);
        }
    }
}

impl Effect for Reverb {
    fn process(&mut self, input: f32) -> f32 {
        let mut comb_sum = 0.0f32;
        for comb in &mut self.combs {
            comb_sum += comb.process(input);
        }
        let mut out = comb_sum * 0.25;

        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }

        wet_dry_mix(input, out, self.wet)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.combs =
            core::array::from_fn(|i| CombFilter::new(scale_to_rate(COMB_TUNINGS[i], sample_rate)));
        self.allpasses = core::array::from_fn(|i| {
            AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS[i], sample_rate))
        });
        self.apply_parameters();
    }

    fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }
}
