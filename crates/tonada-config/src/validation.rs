//! Profile normalization.
//!
//! Out-of-range values in a profile are clamped to their documented
//! bounds rather than rejected: a hand-edited file should still play,
//! just with sane values. [`normalize`] reports every change it makes
//! so the caller can log them.

use std::fmt;

use tonada_synth::MAX_VOICES;

use crate::profile::Profile;

/// One field [`normalize`] had to change.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    /// Dotted path of the field in the profile file.
    pub field: &'static str,
    /// Value as found.
    pub from: String,
    /// Value after clamping.
    pub to: String,
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.field, self.from, self.to)
    }
}

fn clamp_int<T>(field: &'static str, value: &mut T, min: T, max: T, out: &mut Vec<Adjustment>)
where
    T: Ord + Copy + fmt::Display,
{
    let clamped = (*value).clamp(min, max);
    if clamped != *value {
        out.push(Adjustment {
            field,
            from: value.to_string(),
            to: clamped.to_string(),
        });
        *value = clamped;
    }
}

/// Clamp a float field; NaN and infinity fall back to the field's
/// default rather than propagating.
fn clamp_f32(
    field: &'static str,
    value: &mut f32,
    min: f32,
    max: f32,
    fallback: f32,
    out: &mut Vec<Adjustment>,
) {
    let clamped = if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    };
    if clamped != *value {
        out.push(Adjustment {
            field,
            from: value.to_string(),
            to: clamped.to_string(),
        });
        *value = clamped;
    }
}

/// Clamp every out-of-range field to its documented bound and return
/// the list of adjustments made.
pub fn normalize(profile: &mut Profile) -> Vec<Adjustment> {
    let mut adj = Vec::new();

    clamp_int("sample_rate", &mut profile.sample_rate, 8000, 96000, &mut adj);
    clamp_int("voices", &mut profile.voices, 1, MAX_VOICES, &mut adj);

    clamp_int(
        "backend.buffer_size",
        &mut profile.backend.buffer_size,
        32,
        4096,
        &mut adj,
    );
    clamp_int(
        "backend.num_buffers",
        &mut profile.backend.num_buffers,
        2,
        16,
        &mut adj,
    );

    clamp_f32(
        "filter.cutoff_hz",
        &mut profile.filter.cutoff_hz,
        20.0,
        20000.0,
        1000.0,
        &mut adj,
    );
    clamp_f32(
        "filter.resonance",
        &mut profile.filter.resonance,
        0.0,
        0.99,
        0.1,
        &mut adj,
    );

    clamp_int("eq.low_db", &mut profile.eq.low_db, -12, 12, &mut adj);
    clamp_int("eq.mid_db", &mut profile.eq.mid_db, -12, 12, &mut adj);
    clamp_int("eq.high_db", &mut profile.eq.high_db, -12, 12, &mut adj);

    clamp_f32(
        "reverb.room_size",
        &mut profile.reverb.room_size,
        0.0,
        1.0,
        0.5,
        &mut adj,
    );
    clamp_f32(
        "reverb.damping",
        &mut profile.reverb.damping,
        0.0,
        1.0,
        0.5,
        &mut adj,
    );
    clamp_f32("reverb.wet", &mut profile.reverb.wet, 0.0, 1.0, 0.33, &mut adj);

    clamp_int("delay.time_ms", &mut profile.delay.time_ms, 10, 1000, &mut adj);
    clamp_int("delay.feedback", &mut profile.delay.feedback, 0, 90, &mut adj);
    clamp_int("delay.mix", &mut profile.delay.mix, 0, 100, &mut adj);

    clamp_f32("lfo.rate_hz", &mut profile.lfo.rate_hz, 0.1, 20.0, 5.0, &mut adj);
    clamp_int("lfo.depth", &mut profile.lfo.depth, 0, 100, &mut adj);

    adj
}
