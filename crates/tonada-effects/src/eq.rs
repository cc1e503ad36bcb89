//! Fixed three-band peaking equalizer.
//!
//! Bass, mid, and treble bands at fixed center frequencies, applied in
//! series. Gains are whole decibels in a small signed range, the way
//! the control surface exposes them. A band at 0 dB is given identity
//! coefficients and skipped outright, so the flat setting is a true
//! bypass.

use tonada_core::{Biquad, Effect, peaking_coefficients};

/// Center frequencies of the bass, mid, and treble bands in Hz.
pub const EQ_BAND_FREQUENCIES: [f32; 3] = [120.0, 1000.0, 8000.0];

/// Shared bandwidth for all three bands.
const BAND_Q: f32 = 0.707;

/// Gain limit in whole dB, symmetric around zero.
pub const EQ_MAX_GAIN_DB: i8 = 12;

/// Three peaking filters in series with integer-dB gains.
///
/// # Example
///
/// ```rust
/// use tonada_core::Effect;
/// use tonada_effects::ThreeBandEq;
///
/// let mut eq = ThreeBandEq::new(22050.0);
/// eq.set_low_gain(4);
/// eq.set_high_gain(-3);
/// let out = eq.process(0.5);
/// # let _ = out;
/// ```
#[derive(Debug, Clone)]
pub struct ThreeBandEq {
    filters: [Biquad; 3],
    gains: [i8; 3],
    sample_rate: f32,
}

impl ThreeBandEq {
    /// Create a flat EQ at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            filters: [Biquad::new(), Biquad::new(), Biquad::new()],
            gains: [0; 3],
            sample_rate,
        }
    }

    /// Set the bass band gain in dB (clamped to ±[`EQ_MAX_GAIN_DB`]).
    pub fn set_low_gain(&mut self, gain_db: i8) {
        self.set_band(0, gain_db);
    }

    /// Bass band gain in dB.
    pub fn low_gain(&self) -> i8 {
        self.gains[0]
    }

    /// Set the mid band gain in dB (clamped to ±[`EQ_MAX_GAIN_DB`]).
    pub fn set_mid_gain(&mut self, gain_db: i8) {
        self.set_band(1, gain_db);
    }

    /// Mid band gain in dB.
    pub fn mid_gain(&self) -> i8 {
        self.gains[1]
    }

    /// Set the treble band gain in dB (clamped to ±[`EQ_MAX_GAIN_DB`]).
    pub fn set_high_gain(&mut self, gain_db: i8) {
        self.set_band(2, gain_db);
    }

    /// Treble band gain in dB.
    pub fn high_gain(&self) -> i8 {
        self.gains[2]
    }

    /// All three gains, low to high.
    pub fn gains(&self) -> [i8; 3] {
        self.gains
    }

    fn set_band(&mut self, band: usize, gain_db: i8) {
        self.gains[band] = gain_db.clamp(-EQ_MAX_GAIN_DB, EQ_MAX_GAIN_DB);
        self.update_band(band);
    }

    /// Recompute one band's coefficients and clear its state, so a
    /// gain change never replays history through new coefficients.
    fn update_band(&mut self, band: usize) {
        let gain = self.gains[band];
        if gain == 0 {
            self.filters[band].set_identity();
        } else {
            let coeffs = peaking_coefficients(
                EQ_BAND_FREQUENCIES[band],
                BAND_Q,
                f32::from(gain),
                self.sample_rate,
            );
            self.filters[band].set_coefficients(coeffs);
        }
        self.filters[band].reset();
    }
}

impl Effect for ThreeBandEq {
    fn process(&mut self, input: f32) -> f32 {
        let mut out = input;
        for (filter, &gain) in self.filters.iter_mut().zip(&self.gains) {
            if gain != 0 {
                out = filter.process(out);
            }
        }
        out
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for band in 0..self.filters.len() {
            self.update_band(band);
        }
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}
