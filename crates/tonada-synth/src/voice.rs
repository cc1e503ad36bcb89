//! Voice and voice bank.
//!
//! A [`Voice`] is one sounding note: oscillator, envelope, velocity. The
//! [`VoiceBank`] owns a fixed array of them and decides which voice a
//! note-on lands in.
//!
//! # Allocation policy
//!
//! Note-on takes the first inactive slot in the configured pool. If
//! every slot is busy, slot 0 is stolen outright with no click-avoiding
//! fade, matching the original hardware behavior. A voice frees itself
//! when its envelope finishes the release ramp.

use tonada_core::SineTable;

use crate::envelope::Envelope;
use crate::oscillator::{Oscillator, Waveform};

/// Convert a MIDI note number to frequency in Hz.
///
/// Uses standard tuning: A4 (note 69) = 440 Hz.
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * libm::powf(2.0, (note as f32 - 69.0) / 12.0)
}

/// One polyphonic voice: oscillator + envelope + per-note state.
#[derive(Debug, Clone, Default)]
pub struct Voice {
    active: bool,
    note: u8,
    velocity: u8,
    osc: Oscillator,
    env: Envelope,
}

impl Voice {
    /// Create an inactive voice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing a note: derive the phase increment from the MIDI
    /// note, reset phase, trigger the envelope attack.
    pub fn note_on(&mut self, note: u8, velocity: u8, sample_rate: f32) {
        self.osc.set_frequency(midi_to_freq(note), sample_rate);
        self.osc.reset_phase();
        self.note = note;
        self.velocity = velocity;
        self.active = true;
        self.env.gate_on();
    }

    /// Begin the release ramp. The voice stays active until the
    /// envelope reaches off.
    pub fn note_off(&mut self) {
        self.env.gate_off();
    }

    /// Silence the voice immediately, skipping the release ramp.
    pub fn kill(&mut self) {
        self.active = false;
        self.env.reset();
    }

    /// Whether this voice is currently claimed by a note.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// MIDI note this voice is (or was last) playing.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Velocity of the current note.
    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Set the oscillator waveform.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    /// Envelope state, for inspection.
    pub fn env(&self) -> &Envelope {
        &self.env
    }

    /// Render one sample.
    ///
    /// Inactive voices return 0 with no side effects. A voice whose
    /// envelope finishes during this call frees itself and returns 0.
    /// Scaling order: envelope/255, then velocity/127, then tremolo,
    /// then clamp to i16.
    #[inline]
    pub fn render(&mut self, table: &SineTable, vibrato: f32, tremolo: f32) -> i16 {
        if !self.active {
            return 0;
        }

        let env_value = i32::from(self.env.advance());
        if !self.env.is_active() {
            self.active = false;
            return 0;
        }

        let raw = i32::from(self.osc.advance(table, vibrato));
        let mut sample = raw * env_value / 255;
        sample = sample * i32::from(self.velocity) / 127;

        if tremolo != 1.0 {
            sample = (sample as f32 * tremolo) as i32;
        }

        sample.clamp(-32768, 32767) as i16
    }
}

/// Capacity of the voice array; the usable pool size is configured at
/// or below this.
pub const MAX_VOICES: usize = 8;

/// Fixed pool of voices with note allocation.
///
/// # Example
///
/// ```rust
/// use tonada_core::SineTable;
/// use tonada_synth::VoiceBank;
///
/// let table = SineTable::new();
/// let mut bank = VoiceBank::new(4);
/// bank.note_on(60, 100, 22050.0);
/// bank.note_on(64, 100, 22050.0);
/// assert_eq!(bank.active_count(), 2);
///
/// let (sum, contributors) = bank.render(&table, 0.0, 1.0);
/// # let _ = (sum, contributors);
/// bank.note_off(60);
/// ```
#[derive(Debug, Clone)]
pub struct VoiceBank {
    voices: [Voice; MAX_VOICES],
    pool_size: usize,
    waveform: Waveform,
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::new(4)
    }
}

impl VoiceBank {
    /// Create a bank using the first `pool_size` voices (clamped to
    /// 1..=[`MAX_VOICES`]).
    pub fn new(pool_size: usize) -> Self {
        Self {
            voices: Default::default(),
            pool_size: pool_size.clamp(1, MAX_VOICES),
            waveform: Waveform::default(),
        }
    }

    /// Number of allocatable voices.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Resize the usable pool. Voices beyond the new size are killed so
    /// they can't keep sounding outside the render loop.
    pub fn set_pool_size(&mut self, pool_size: usize) {
        self.pool_size = pool_size.clamp(1, MAX_VOICES);
        for voice in &mut self.voices[self.pool_size..] {
            voice.kill();
        }
    }

    /// Set the waveform on every voice, sounding ones included.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        for voice in &mut self.voices {
            voice.set_waveform(waveform);
        }
    }

    /// Current bank waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Allocate a voice for a note: first free slot in the pool, or
    /// slot 0 stolen when none is free. Returns the slot used.
    pub fn note_on(&mut self, note: u8, velocity: u8, sample_rate: f32) -> usize {
        let slot = self.voices[..self.pool_size]
            .iter()
            .position(|v| !v.is_active())
            .unwrap_or(0);
        self.voices[slot].note_on(note, velocity, sample_rate);
        slot
    }

    /// Release every voice playing `note` (chords retrigger the same
    /// note into multiple slots; all of them must release).
    pub fn note_off(&mut self, note: u8) {
        for voice in &mut self.voices[..self.pool_size] {
            if voice.is_active() && voice.note() == note {
                voice.note_off();
            }
        }
    }

    /// Release every active voice (they ramp out through release).
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.note_off();
            }
        }
    }

    /// Hard-stop every voice with no release ramp.
    pub fn kill_all(&mut self) {
        for voice in &mut self.voices {
            voice.kill();
        }
    }

    /// Number of currently active voices in the pool.
    pub fn active_count(&self) -> usize {
        self.voices[..self.pool_size]
            .iter()
            .filter(|v| v.is_active())
            .count()
    }

    /// Inspect a voice slot.
    pub fn voice(&self, index: usize) -> &Voice {
        &self.voices[index]
    }

    /// Render one sample from every active voice.
    ///
    /// Returns the raw sum and the number of voices that contributed
    /// (counted before rendering, so a voice that frees itself during
    /// this call still counts once). The mixer divides by the count.
    #[inline]
    pub fn render(&mut self, table: &SineTable, vibrato: f32, tremolo: f32) -> (i32, u32) {
        let mut sum = 0i32;
        let mut contributors = 0u32;
        for voice in &mut self.voices[..self.pool_size] {
            if voice.is_active() {
                sum += i32::from(voice.render(table, vibrato, tremolo));
                contributors += 1;
            }
        }
        (sum, contributors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{ATTACK_SAMPLES, RELEASE_SAMPLES};

    const SR: f32 = 22050.0;

    #[test]
    fn test_midi_to_freq_a4() {
        assert_eq!(midi_to_freq(69), 440.0);
    }

    #[test]
    fn test_midi_to_freq_all_notes() {
        for note in 0u8..=127 {
            let expected = 440.0 * libm::powf(2.0, (f32::from(note) - 69.0) / 12.0);
            let got = midi_to_freq(note);
            assert!((got - expected).abs() < 1e-3, "note {note}: {got}");
        }
        // Octave relationships hold
        assert!((midi_to_freq(81) - 880.0).abs() < 0.01);
        assert!((midi_to_freq(57) - 220.0).abs() < 0.01);
    }

    #[test]
    fn test_inactive_voice_renders_silence() {
        let table = SineTable::new();
        let mut voice = Voice::new();
        for _ in 0..100 {
            assert_eq!(voice.render(&table, 0.0, 1.0), 0);
        }
    }

    #[test]
    fn test_voice_frees_itself_after_release() {
        let table = SineTable::new();
        let mut voice = Voice::new();
        voice.note_on(69, 127, SR);
        for _ in 0..1000 {
            voice.render(&table, 0.0, 1.0);
        }
        voice.note_off();
        for _ in 0..RELEASE_SAMPLES {
            voice.render(&table, 0.0, 1.0);
        }
        assert!(!voice.is_active());
    }

    #[test]
    fn test_velocity_scales_output() {
        let table = SineTable::new();
        let mut loud = Voice::new();
        let mut soft = Voice::new();
        loud.set_waveform(Waveform::Square);
        soft.set_waveform(Waveform::Square);
        loud.note_on(69, 127, SR);
        soft.note_on(69, 63, SR);

        // Sample deep into sustain where the envelope is flat
        let mut last = (0, 0);
        for _ in 0..(ATTACK_SAMPLES + 2000) {
            last = (
                i32::from(loud.render(&table, 0.0, 1.0)),
                i32::from(soft.render(&table, 0.0, 1.0)),
            );
        }
        let ratio = last.1 as f32 / last.0 as f32;
        assert!((ratio - 63.0 / 127.0).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn test_bank_allocates_free_slots_in_order() {
        let mut bank = VoiceBank::new(4);
        assert_eq!(bank.note_on(60, 100, SR), 0);
        assert_eq!(bank.note_on(64, 100, SR), 1);
        assert_eq!(bank.note_on(67, 100, SR), 2);
        assert_eq!(bank.active_count(), 3);
    }

    #[test]
    fn test_bank_steals_slot_zero_when_full() {
        let mut bank = VoiceBank::new(2);
        bank.note_on(60, 100, SR);
        bank.note_on(62, 100, SR);
        let slot = bank.note_on(64, 100, SR);
        assert_eq!(slot, 0);
        assert_eq!(bank.voice(0).note(), 64);
        assert_eq!(bank.voice(1).note(), 62);
        assert_eq!(bank.active_count(), 2);
    }

    #[test]
    fn test_note_off_releases_all_matching() {
        let table = SineTable::new();
        let mut bank = VoiceBank::new(4);
        bank.note_on(60, 100, SR);
        bank.note_on(60, 100, SR);
        bank.note_on(72, 100, SR);
        bank.note_off(60);
        // Both 60s ramp out; 72 keeps sounding
        for _ in 0..(RELEASE_SAMPLES + 10) {
            bank.render(&table, 0.0, 1.0);
        }
        assert_eq!(bank.active_count(), 1);
        assert!(bank.voice(2).is_active());
    }

    #[test]
    fn test_pool_size_limits_allocation() {
        let mut bank = VoiceBank::new(3);
        for note in [60, 62, 64] {
            bank.note_on(note, 100, SR);
        }
        // Pool full at 3 even though the array holds MAX_VOICES
        assert_eq!(bank.note_on(65, 100, SR), 0);
    }

    #[test]
    fn test_shrinking_pool_kills_out_of_range_voices() {
        let mut bank = VoiceBank::new(4);
        for note in [60, 62, 64, 65] {
            bank.note_on(note, 100, SR);
        }
        bank.set_pool_size(2);
        assert_eq!(bank.active_count(), 2);
        assert!(!bank.voice(2).is_active());
        assert!(!bank.voice(3).is_active());
    }

    #[test]
    fn test_kill_all_is_immediate() {
        let table = SineTable::new();
        let mut bank = VoiceBank::new(4);
        bank.note_on(60, 100, SR);
        bank.note_on(64, 100, SR);
        bank.kill_all();
        assert_eq!(bank.active_count(), 0);
        let (sum, contributors) = bank.render(&table, 0.0, 1.0);
        assert_eq!((sum, contributors), (0, 0));
    }

    #[test]
    fn test_waveform_propagates_to_sounding_voices() {
        let mut bank = VoiceBank::new(4);
        bank.note_on(60, 100, SR);
        bank.set_waveform(Waveform::Noise);
        assert_eq!(bank.voice(0).waveform(), Waveform::Noise);
    }

    #[test]
    fn test_render_counts_contributors() {
        let table = SineTable::new();
        let mut bank = VoiceBank::new(4);
        bank.note_on(60, 100, SR);
        bank.note_on(64, 100, SR);
        let (_, contributors) = bank.render(&table, 0.0, 1.0);
        assert_eq!(contributors, 2);
    }
}
