//! Fixed-timing amplitude envelope.
//!
//! A 5-state envelope generator working entirely in integer arithmetic:
//! the output is a level in 0-255 applied to the oscillator output by
//! integer scaling. Stage lengths are process-wide constants rather than
//! per-voice parameters, which keeps the per-sample path to a compare
//! and a multiply-divide.

/// Attack length in samples (20 ms at the 22.05 kHz reference rate).
pub const ATTACK_SAMPLES: u32 = 441;
/// Decay length in samples.
pub const DECAY_SAMPLES: u32 = 882;
/// Release length in samples.
pub const RELEASE_SAMPLES: u32 = 1764;
/// Sustain level (out of 255).
pub const SUSTAIN_LEVEL: u32 = 200;

/// Envelope stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Inactive; output is zero.
    #[default]
    Off,
    /// Ramp from 0 to 255 over [`ATTACK_SAMPLES`].
    Attack,
    /// Ramp from 255 down to [`SUSTAIN_LEVEL`] over [`DECAY_SAMPLES`].
    Decay,
    /// Hold at [`SUSTAIN_LEVEL`] until gate off.
    Sustain,
    /// Ramp from [`SUSTAIN_LEVEL`] to 0 over [`RELEASE_SAMPLES`], then
    /// off.
    Release,
}

/// Integer ADSR-style envelope.
///
/// [`gate_on`](Envelope::gate_on) restarts the attack unconditionally,
/// even mid-release: the output jumps to the bottom of the attack ramp,
/// which is an audible step when retriggering a sounding voice. That
/// discontinuity is the documented behavior, kept as-is.
/// [`gate_off`](Envelope::gate_off) enters release from the sustain
/// level regardless of the current stage, so a note released mid-attack
/// releases from [`SUSTAIN_LEVEL`], not from its current value.
///
/// # Example
///
/// ```rust
/// use tonada_synth::{Envelope, EnvelopeState};
///
/// let mut env = Envelope::new();
/// env.gate_on();
/// for _ in 0..441 {
///     env.advance();
/// }
/// assert_eq!(env.state(), EnvelopeState::Decay);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    state: EnvelopeState,
    sample_count: u32,
}

impl Envelope {
    /// Create an envelope in the off state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the attack stage. Unconditional; any in-flight stage is
    /// abandoned.
    pub fn gate_on(&mut self) {
        self.state = EnvelopeState::Attack;
        self.sample_count = 0;
    }

    /// Enter the release stage, unless already off.
    pub fn gate_off(&mut self) {
        if self.state != EnvelopeState::Off {
            self.state = EnvelopeState::Release;
            self.sample_count = 0;
        }
    }

    /// Force the envelope off immediately, skipping the release ramp.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Off;
        self.sample_count = 0;
    }

    /// True in every stage except off.
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Off
    }

    /// Current stage.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Advance one sample and return the level (0-255).
    ///
    /// The counter increments before evaluation, so the attack reaches
    /// exactly 255 on the [`ATTACK_SAMPLES`]-th call and the release
    /// reaches 0 (and goes off) on the [`RELEASE_SAMPLES`]-th.
    #[inline]
    pub fn advance(&mut self) -> u8 {
        if self.state == EnvelopeState::Off {
            return 0;
        }

        self.sample_count += 1;
        let count = self.sample_count;

        match self.state {
            EnvelopeState::Attack => {
                if count >= ATTACK_SAMPLES {
                    self.state = EnvelopeState::Decay;
                    self.sample_count = 0;
                    255
                } else {
                    (count * 255 / ATTACK_SAMPLES) as u8
                }
            }
            EnvelopeState::Decay => {
                if count >= DECAY_SAMPLES {
                    self.state = EnvelopeState::Sustain;
                    SUSTAIN_LEVEL as u8
                } else {
                    (255 - count * (255 - SUSTAIN_LEVEL) / DECAY_SAMPLES) as u8
                }
            }
            EnvelopeState::Sustain => SUSTAIN_LEVEL as u8,
            EnvelopeState::Release => {
                if count >= RELEASE_SAMPLES {
                    self.state = EnvelopeState::Off;
                    0
                } else {
                    (SUSTAIN_LEVEL - count * SUSTAIN_LEVEL / RELEASE_SAMPLES) as u8
                }
            }
            EnvelopeState::Off => 0,
        }
    }
}
