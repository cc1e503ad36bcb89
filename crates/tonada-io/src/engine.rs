//! The polyphonic render engine and its control surface.
//!
//! [`AudioEngine`] owns everything the hot path touches: the voice
//! bank, the melody player, the LFO and the effects chain. It never
//! locks. Control happens through the paired [`EngineController`]:
//! scalar parameters (volume, LFO switches, rate, depth) live in
//! shared atomics read once per sample, while structural changes
//! (notes, waveform, pool size, effect install/remove) travel through
//! an unbounded command queue drained at each sample boundary, so a
//! parameter flip can never tear a sample in half.
//!
//! Effect installation allocates on the control side via the fallible
//! constructors; the render side only ever receives a ready-made box.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tonada_config::Profile;
use tonada_core::{Lfo, LfoWaveform, SvfOutput};
use tonada_effects::{Echo, EffectsChain, Reverb};
use tonada_synth::{MelodyPlayer, Note, RELEASE_SAMPLES, SineTable, VoiceBank, Waveform};
use tracing::{debug, info, warn};

use crate::params::SharedParams;
use crate::sink::PcmSource;
use crate::{Error, Result};

/// Structural changes applied between samples.
enum Command {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
    KillAll,
    SetWaveform(Waveform),
    SetPoolSize(usize),
    PlayMelody(Vec<Note>),
    StopMelody,
    SetFilterEnabled(bool),
    SetFilterMode(SvfOutput),
    SetFilterCutoff(f32),
    SetFilterResonance(f32),
    SetEqEnabled(bool),
    SetEqGains { low: i8, mid: i8, high: i8 },
    InstallReverb(Box<Reverb>),
    RemoveReverb,
    SetReverbParams { room_size: f32, damping: f32, wet: f32 },
    InstallEcho(Box<Echo>),
    RemoveEcho,
    SetEchoParams { time_ms: u16, feedback: u8, mix: u8 },
    SetLfoShape(LfoWaveform),
    SetPcmSource(Box<dyn PcmSource>),
    ClearPcmSource,
}

/// Single-threaded polyphonic renderer.
///
/// One instance produces the full signal path: voices are summed and
/// averaged, external PCM is mixed in, master volume is applied, the
/// effects chain shapes the result and the sample is clamped to
/// `i16`. Drive it block-wise with [`render_block`], offline with
/// [`render_melody`], or one sample at a time with [`poll`].
///
/// [`render_block`]: AudioEngine::render_block
/// [`render_melody`]: AudioEngine::render_melody
/// [`poll`]: AudioEngine::poll
pub struct AudioEngine {
    sample_rate: u32,
    table: SineTable,
    bank: VoiceBank,
    melody: MelodyPlayer,
    chain: EffectsChain,
    lfo: Lfo,
    /// Bit pattern of the LFO rate last pushed into `lfo`, compared
    /// against the shared atomic to detect rate changes cheaply.
    lfo_rate_bits: u32,
    params: Arc<SharedParams>,
    commands: Receiver<Command>,
    pcm: Option<Box<dyn PcmSource>>,
    samples_rendered: u64,
    poll_origin_micros: Option<u64>,
    poll_emitted: u64,
    missed_deadlines: u64,
}

impl AudioEngine {
    /// Creates an engine at `sample_rate` with reference defaults
    /// (four voices, sine, volume 200, all effects off), paired with
    /// the controller that drives it.
    #[must_use]
    pub fn new(sample_rate: u32) -> (Self, EngineController) {
        let params = Arc::new(SharedParams::new());
        let (tx, rx) = mpsc::channel();
        let rate = sample_rate as f32;
        let engine = Self {
            sample_rate,
            table: SineTable::new(),
            bank: VoiceBank::new(4),
            melody: MelodyPlayer::new(),
            chain: EffectsChain::new(rate),
            lfo: Lfo::new(rate, 5.0),
            lfo_rate_bits: 5.0f32.to_bits(),
            params: Arc::clone(&params),
            commands: rx,
            pcm: None,
            samples_rendered: 0,
            poll_origin_micros: None,
            poll_emitted: 0,
            missed_deadlines: 0,
        };
        let controller = EngineController {
            params,
            commands: tx,
            sample_rate,
        };
        (engine, controller)
    }

    /// Creates an engine configured from a profile.
    ///
    /// A reverb or delay section whose buffer cannot be allocated is
    /// logged and left disabled; every other field applies as given
    /// (profiles are normalized on load, so values are already in
    /// range).
    #[must_use]
    pub fn from_profile(profile: &Profile) -> (Self, EngineController) {
        let (mut engine, controller) = Self::new(profile.sample_rate);
        engine.bank.set_pool_size(profile.voices);
        engine.bank.set_waveform(profile.waveform.into());
        controller.params.set_volume(profile.volume);

        engine.chain.set_filter_enabled(profile.filter.enabled);
        let filter = engine.chain.filter_mut();
        filter.set_mode(profile.filter.mode.into());
        filter.set_cutoff(profile.filter.cutoff_hz);
        filter.set_resonance(profile.filter.resonance);

        engine.chain.set_eq_enabled(profile.eq.enabled);
        let eq = engine.chain.eq_mut();
        eq.set_low_gain(profile.eq.low_db);
        eq.set_mid_gain(profile.eq.mid_db);
        eq.set_high_gain(profile.eq.high_db);

        if profile.reverb.enabled {
            match Reverb::try_new(profile.sample_rate as f32) {
                Ok(mut reverb) => {
                    reverb.set_room_size(profile.reverb.room_size);
                    reverb.set_damping(profile.reverb.damping);
                    reverb.set_wet(profile.reverb.wet);
                    engine.chain.install_reverb(reverb);
                }
                Err(_) => warn!("reverb buffer allocation failed; effect stays disabled"),
            }
        }
        if profile.delay.enabled {
            match Echo::try_new(profile.sample_rate as f32) {
                Ok(mut echo) => {
                    echo.set_time_ms(profile.delay.time_ms);
                    echo.set_feedback(profile.delay.feedback);
                    echo.set_mix(profile.delay.mix);
                    engine.chain.install_echo(echo);
                }
                Err(_) => warn!("delay buffer allocation failed; effect stays disabled"),
            }
        }

        controller.params.set_lfo_enabled(profile.lfo.enabled);
        controller.params.set_vibrato_enabled(profile.lfo.vibrato);
        controller.params.set_tremolo_enabled(profile.lfo.tremolo);
        controller.params.set_lfo_rate_hz(profile.lfo.rate_hz);
        controller.params.set_lfo_depth(profile.lfo.depth);
        engine.lfo.set_waveform(profile.lfo.shape.into());
        engine.lfo_rate_bits = controller.params.lfo_rate_bits();
        engine.lfo.set_frequency(controller.params.lfo_rate_hz());

        info!(
            profile = %profile.name,
            sample_rate = profile.sample_rate,
            voices = profile.voices,
            "engine configured from profile"
        );
        (engine, controller)
    }

    /// Engine sample rate in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total samples produced since creation.
    #[must_use]
    pub fn samples_rendered(&self) -> u64 {
        self.samples_rendered
    }

    /// Sample periods the poll clock has skipped so far.
    #[must_use]
    pub fn missed_deadlines(&self) -> u64 {
        self.missed_deadlines
    }

    /// Number of voices currently sounding.
    #[must_use]
    pub fn active_voices(&self) -> usize {
        self.bank.active_count()
    }

    /// Whether a melody is in progress.
    #[must_use]
    pub fn melody_playing(&self) -> bool {
        self.melody.is_playing()
    }

    /// The effects chain, for inspection.
    #[must_use]
    pub fn chain(&self) -> &EffectsChain {
        &self.chain
    }

    /// Fills `block` with consecutive samples. Pending control
    /// commands are drained at each sample boundary.
    pub fn render_block(&mut self, block: &mut [i16]) {
        for sample in block {
            *sample = self.next_sample();
        }
    }

    /// Renders a melody offline, returning the full take including the
    /// release tail after the last note. An empty sequence yields an
    /// empty buffer.
    pub fn render_melody(&mut self, sequence: &[Note]) -> Vec<i16> {
        if sequence.is_empty() {
            return Vec::new();
        }
        let rate = self.sample_rate as f32;
        let total_ms: u64 = sequence.iter().map(|note| u64::from(note.duration_ms)).sum();
        let expected = total_ms * u64::from(self.sample_rate) / 1000 + u64::from(RELEASE_SAMPLES) + 1;
        let mut samples = Vec::with_capacity(expected as usize);

        let now = self.now_ms();
        self.melody.play(sequence, now, &mut self.bank, rate);
        while self.melody.is_playing() {
            samples.push(self.next_sample());
        }
        for _ in 0..RELEASE_SAMPLES {
            samples.push(self.next_sample());
        }
        samples
    }

    /// Produces at most one sample, paced by a caller-supplied
    /// microsecond clock.
    ///
    /// The first call fixes the clock origin and emits immediately;
    /// afterwards one sample is due every `1_000_000 / sample_rate`
    /// microseconds on a fixed grid. A call before the next due time
    /// returns `None`. A late call emits a single sample and counts
    /// the periods that went by unserved in
    /// [`missed_deadlines`](AudioEngine::missed_deadlines) instead of
    /// backfilling them.
    pub fn poll(&mut self, now_micros: u64) -> Option<i16> {
        let rate = u64::from(self.sample_rate);
        let origin = *self.poll_origin_micros.get_or_insert(now_micros);
        let due = origin + self.poll_emitted * 1_000_000 / rate;
        if now_micros < due {
            return None;
        }
        let due_count = (now_micros - origin) * rate / 1_000_000 + 1;
        if due_count > self.poll_emitted + 1 {
            self.missed_deadlines += due_count - self.poll_emitted - 1;
            self.poll_emitted = due_count - 1;
        }
        self.poll_emitted += 1;
        Some(self.next_sample())
    }

    fn now_ms(&self) -> u64 {
        self.samples_rendered * 1000 / u64::from(self.sample_rate)
    }

    #[inline]
    fn next_sample(&mut self) -> i16 {
        self.drain_commands();
        let rate = self.sample_rate as f32;
        let now_ms = self.now_ms();
        self.melody.update(now_ms, &mut self.bank, rate);

        let (vibrato, tremolo) = self.modulation();
        let (sum, contributors) = self.bank.render(&self.table, vibrato, tremolo);
        let mut mixed = if contributors > 1 {
            sum / contributors as i32
        } else {
            sum
        };

        if let Some(mut source) = self.pcm.take() {
            let mut frame = [0i16; 1];
            if source.read(&mut frame) == 0 {
                debug!("external source drained");
            } else {
                mixed += i32::from(frame[0]);
                self.pcm = Some(source);
            }
        }

        let scaled = mixed * i32::from(self.params.volume()) / 255;
        let shaped = self.chain.process(scaled);
        self.samples_rendered += 1;
        shaped.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }

    /// Per-sample vibrato offset and tremolo gain. With the LFO master
    /// switch off the oscillator holds its phase and the pair is
    /// neutral (0.0, 1.0).
    fn modulation(&mut self) -> (f32, f32) {
        if !self.params.lfo_enabled() {
            return (0.0, 1.0);
        }
        let rate_bits = self.params.lfo_rate_bits();
        if rate_bits != self.lfo_rate_bits {
            self.lfo_rate_bits = rate_bits;
            self.lfo.set_frequency(f32::from_bits(rate_bits));
        }
        let depth = f32::from(self.params.lfo_depth()) / 100.0;
        let value = self.lfo.next();
        let vibrato = if self.params.vibrato_enabled() {
            value * depth * 0.02
        } else {
            0.0
        };
        let tremolo = if self.params.tremolo_enabled() {
            1.0 - depth * 0.5 * (1.0 + value)
        } else {
            1.0
        };
        (vibrato, tremolo)
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        let rate = self.sample_rate as f32;
        match command {
            Command::NoteOn { note, velocity } => {
                debug!(note, velocity, "note on");
                self.bank.note_on(note, velocity, rate);
            }
            Command::NoteOff { note } => {
                debug!(note, "note off");
                self.bank.note_off(note);
            }
            Command::AllNotesOff => self.bank.all_notes_off(),
            Command::KillAll => self.bank.kill_all(),
            Command::SetWaveform(waveform) => self.bank.set_waveform(waveform),
            Command::SetPoolSize(size) => self.bank.set_pool_size(size),
            Command::PlayMelody(notes) => {
                let now = self.now_ms();
                self.melody.play(&notes, now, &mut self.bank, rate);
            }
            Command::StopMelody => self.melody.stop(&mut self.bank),
            Command::SetFilterEnabled(enabled) => self.chain.set_filter_enabled(enabled),
            Command::SetFilterMode(mode) => self.chain.filter_mut().set_mode(mode),
            Command::SetFilterCutoff(cutoff_hz) => self.chain.filter_mut().set_cutoff(cutoff_hz),
            Command::SetFilterResonance(resonance) => {
                self.chain.filter_mut().set_resonance(resonance);
            }
            Command::SetEqEnabled(enabled) => self.chain.set_eq_enabled(enabled),
            Command::SetEqGains { low, mid, high } => {
                let eq = self.chain.eq_mut();
                eq.set_low_gain(low);
                eq.set_mid_gain(mid);
                eq.set_high_gain(high);
            }
            Command::InstallReverb(reverb) => self.chain.install_reverb(*reverb),
            Command::RemoveReverb => {
                self.chain.remove_reverb();
            }
            Command::SetReverbParams { room_size, damping, wet } => {
                if let Some(reverb) = self.chain.reverb_mut() {
                    reverb.set_room_size(room_size);
                    reverb.set_damping(damping);
                    reverb.set_wet(wet);
                }
            }
            Command::InstallEcho(echo) => self.chain.install_echo(*echo),
            Command::RemoveEcho => {
                self.chain.remove_echo();
            }
            Command::SetEchoParams { time_ms, feedback, mix } => {
                if let Some(echo) = self.chain.echo_mut() {
                    echo.set_time_ms(time_ms);
                    echo.set_feedback(feedback);
                    echo.set_mix(mix);
                }
            }
            Command::SetLfoShape(shape) => self.lfo.set_waveform(shape),
            Command::SetPcmSource(source) => self.pcm = Some(source),
            Command::ClearPcmSource => self.pcm = None,
        }
    }
}

/// Cloneable control handle for a running [`AudioEngine`].
///
/// Scalar setters store straight into shared atomics; everything else
/// queues a command the engine applies at the next sample boundary.
/// Once the engine is dropped, commands are discarded silently.
#[derive(Debug, Clone)]
pub struct EngineController {
    params: Arc<SharedParams>,
    commands: Sender<Command>,
    sample_rate: u32,
}

impl EngineController {
    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("engine is gone; dropping command");
        }
    }

    /// Sample rate of the paired engine, in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Starts a note (MIDI pitch, velocity 0-127).
    pub fn note_on(&self, note: u8, velocity: u8) {
        self.send(Command::NoteOn { note, velocity });
    }

    /// Releases every voice playing `note`.
    pub fn note_off(&self, note: u8) {
        self.send(Command::NoteOff { note });
    }

    /// Releases all voices through their envelopes.
    pub fn all_notes_off(&self) {
        self.send(Command::AllNotesOff);
    }

    /// Hard-stops all voices with no release ramp.
    pub fn kill_all(&self) {
        self.send(Command::KillAll);
    }

    /// Switches the waveform on every voice, sounding ones included.
    pub fn set_waveform(&self, waveform: Waveform) {
        self.send(Command::SetWaveform(waveform));
    }

    /// Resizes the usable voice pool.
    pub fn set_pool_size(&self, pool_size: usize) {
        self.send(Command::SetPoolSize(pool_size));
    }

    /// Starts a melody, replacing any in progress.
    pub fn play_melody(&self, sequence: &[Note]) {
        self.send(Command::PlayMelody(sequence.to_vec()));
    }

    /// Stops the melody and releases its notes.
    pub fn stop_melody(&self) {
        self.send(Command::StopMelody);
    }

    /// Master volume, 0-255.
    pub fn set_volume(&self, volume: u8) {
        self.params.set_volume(volume);
    }

    /// LFO master switch. While off, the LFO holds its phase.
    pub fn set_lfo_enabled(&self, enabled: bool) {
        self.params.set_lfo_enabled(enabled);
    }

    /// Routes the LFO to pitch.
    pub fn set_vibrato_enabled(&self, enabled: bool) {
        self.params.set_vibrato_enabled(enabled);
    }

    /// Routes the LFO to amplitude.
    pub fn set_tremolo_enabled(&self, enabled: bool) {
        self.params.set_tremolo_enabled(enabled);
    }

    /// LFO rate in Hz, clamped to 0.1-20.
    pub fn set_lfo_rate_hz(&self, rate_hz: f32) {
        self.params.set_lfo_rate_hz(rate_hz);
    }

    /// LFO depth in percent, clamped to 0-100.
    pub fn set_lfo_depth(&self, percent: u8) {
        self.params.set_lfo_depth(percent);
    }

    /// LFO waveform shape.
    pub fn set_lfo_shape(&self, shape: LfoWaveform) {
        self.send(Command::SetLfoShape(shape));
    }

    /// Toggles the state-variable filter stage.
    pub fn set_filter_enabled(&self, enabled: bool) {
        self.send(Command::SetFilterEnabled(enabled));
    }

    /// Filter response (low-pass, high-pass, band-pass).
    pub fn set_filter_mode(&self, mode: SvfOutput) {
        self.send(Command::SetFilterMode(mode));
    }

    /// Filter cutoff in Hz.
    pub fn set_filter_cutoff(&self, cutoff_hz: f32) {
        self.send(Command::SetFilterCutoff(cutoff_hz));
    }

    /// Filter resonance.
    pub fn set_filter_resonance(&self, resonance: f32) {
        self.send(Command::SetFilterResonance(resonance));
    }

    /// Toggles the three-band EQ stage.
    pub fn set_eq_enabled(&self, enabled: bool) {
        self.send(Command::SetEqEnabled(enabled));
    }

    /// EQ band gains in dB.
    pub fn set_eq_gains(&self, low: i8, mid: i8, high: i8) {
        self.send(Command::SetEqGains { low, mid, high });
    }

    /// Allocates and installs the reverb.
    ///
    /// The comb and allpass buffers are allocated here on the control
    /// side; the engine receives a ready effect and never touches the
    /// allocator.
    ///
    /// # Errors
    ///
    /// [`Error::EffectAlloc`] when the buffers cannot be allocated.
    /// The chain is left unchanged.
    pub fn enable_reverb(&self, room_size: f32, damping: f32, wet: f32) -> Result<()> {
        let Ok(mut reverb) = Reverb::try_new(self.sample_rate as f32) else {
            warn!("reverb buffer allocation failed; effect stays disabled");
            return Err(Error::EffectAlloc("reverb"));
        };
        reverb.set_room_size(room_size);
        reverb.set_damping(damping);
        reverb.set_wet(wet);
        self.send(Command::InstallReverb(Box::new(reverb)));
        Ok(())
    }

    /// Updates reverb parameters; ignored while the reverb is off.
    pub fn set_reverb_params(&self, room_size: f32, damping: f32, wet: f32) {
        self.send(Command::SetReverbParams {
            room_size,
            damping,
            wet,
        });
    }

    /// Removes the reverb and frees its buffers.
    pub fn disable_reverb(&self) {
        self.send(Command::RemoveReverb);
    }

    /// Allocates and installs the echo.
    ///
    /// # Errors
    ///
    /// [`Error::EffectAlloc`] when the delay ring cannot be allocated.
    /// The chain is left unchanged.
    pub fn enable_echo(&self, time_ms: u16, feedback: u8, mix: u8) -> Result<()> {
        let Ok(mut echo) = Echo::try_new(self.sample_rate as f32) else {
            warn!("delay buffer allocation failed; effect stays disabled");
            return Err(Error::EffectAlloc("delay"));
        };
        echo.set_time_ms(time_ms);
        echo.set_feedback(feedback);
        echo.set_mix(mix);
        self.send(Command::InstallEcho(Box::new(echo)));
        Ok(())
    }

    /// Updates echo parameters; ignored while the echo is off.
    pub fn set_echo_params(&self, time_ms: u16, feedback: u8, mix: u8) {
        self.send(Command::SetEchoParams {
            time_ms,
            feedback,
            mix,
        });
    }

    /// Removes the echo and frees its ring.
    pub fn disable_echo(&self) {
        self.send(Command::RemoveEcho);
    }

    /// Mixes an external PCM source into the output until it drains.
    pub fn play_pcm(&self, source: impl PcmSource + 'static) {
        self.send(Command::SetPcmSource(Box::new(source)));
    }

    /// Drops the external PCM source.
    pub fn stop_pcm(&self) {
        self.send(Command::ClearPcmSource);
    }
}
