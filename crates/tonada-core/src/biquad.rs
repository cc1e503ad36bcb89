//! Biquad filter section.
//!
//! Direct Form I second-order IIR filter with coefficients from the
//! Audio-EQ-Cookbook (R. Bristow-Johnson). Only the peaking response is
//! provided; the parametric EQ runs three of these in series, one per
//! band.

use libm::{cosf, powf, sinf};

use crate::flush_denormal;

/// Unnormalized biquad coefficients `(b0, b1, b2, a0, a1, a2)`.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

/// Peaking-EQ coefficients for a band centered on `frequency`.
///
/// Standard cookbook derivation: `A = 10^(gain/40)`,
/// `ω = 2π·frequency/sample_rate`, `α = sin(ω)/(2·q)`. A gain of 0 dB
/// yields coefficients that reduce exactly to the identity transform.
///
/// # Arguments
///
/// * `frequency` - Center frequency in Hz
/// * `q` - Quality factor (bandwidth); the EQ uses 0.707
/// * `gain_db` - Boost/cut in dB
/// * `sample_rate` - Sample rate in Hz
pub fn peaking_coefficients(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let omega = 2.0 * core::f32::consts::PI * frequency / sample_rate;
    let alpha = sinf(omega) / (2.0 * q);
    let cos_omega = cosf(omega);

    (
        1.0 + alpha * a,  // b0
        -2.0 * cos_omega, // b1
        1.0 - alpha * a,  // b2
        1.0 + alpha / a,  // a0
        -2.0 * cos_omega, // a1
        1.0 - alpha / a,  // a2
    )
}

/// Direct Form I biquad.
///
/// Starts as an identity filter (unity pass-through). Feed it
/// coefficients from [`peaking_coefficients`]; they are normalized by
/// `a0` on the way in.
///
/// # Example
///
/// ```rust
/// use tonada_core::{Biquad, peaking_coefficients};
///
/// let mut band = Biquad::new();
/// band.set_coefficients(peaking_coefficients(1000.0, 0.707, 6.0, 22050.0));
/// let y = band.process(0.25);
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Biquad {
    /// Create an identity biquad (output equals input).
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Install unnormalized coefficients, dividing through by `a0`.
    pub fn set_coefficients(&mut self, (b0, b1, b2, a0, a1, a2): Coefficients) {
        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
    }

    /// Restore identity coefficients (pass-through).
    pub fn set_identity(&mut self) {
        self.b0 = 1.0;
        self.b1 = 0.0;
        self.b2 = 0.0;
        self.a1 = 0.0;
        self.a2 = 0.0;
    }

    /// Clear the filter history without touching coefficients.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Run one sample through the section.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = flush_denormal(output);

        output
    }
}
