//! Single-tap echo on an integer ring buffer.
//!
//! Unlike the other units this one stays in the `i16`/`i32` domain end
//! to end: the delayed tap is stored as `i16`, feedback and mix are
//! whole percentages, and every division is integer division. That is
//! exactly the arithmetic the engine's mixing pipeline uses, so echo
//! repeats are bit-stable rather than drifting through float rounding.

use alloc::collections::TryReserveError;
use alloc::vec;
use alloc::vec::Vec;

use tonada_core::Effect;

/// Shortest selectable delay time.
pub const MIN_ECHO_MS: u16 = 10;

/// Longest selectable delay time; also sizes the ring buffer.
pub const MAX_ECHO_MS: u16 = 1000;

/// Echo with percentage feedback and mix controls.
///
/// ## Parameters
///
/// - `time_ms`: 10–1000 ms between repeats
/// - `feedback`: 0–90 %, how much of each repeat is re-injected
/// - `mix`: 0–100 %, dry/wet split in whole percent
///
/// # Example
///
/// ```rust
/// use tonada_effects::Echo;
///
/// let mut echo = Echo::new(22050.0);
/// echo.set_time_ms(250);
/// echo.set_feedback(50);
/// echo.set_mix(30);
/// let out = echo.process_sample(12_000);
/// # let _ = out;
/// ```
#[derive(Debug, Clone)]
pub struct Echo {
    buffer: Vec<i16>,
    write_pos: usize,
    delay_samples: usize,
    time_ms: u16,
    feedback: u8,
    mix: u8,
    sample_rate: f32,
}

/// Ring size covering the longest delay at this rate.
fn buffer_len(sample_rate: f32) -> usize {
    (sample_rate as usize * usize::from(MAX_ECHO_MS) / 1000).max(1)
}

impl Echo {
    /// Create an echo at the given sample rate with default
    /// parameters (250 ms, feedback 50 %, mix 30 %).
    pub fn new(sample_rate: f32) -> Self {
        let buffer = vec![0i16; buffer_len(sample_rate)];
        Self::with_buffer(buffer, sample_rate)
    }

    /// Fallible constructor: reports ring allocation failure instead
    /// of aborting, so an enable request can be refused cleanly.
    pub fn try_new(sample_rate: f32) -> Result<Self, TryReserveError> {
        let len = buffer_len(sample_rate);
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(len)?;
        buffer.resize(len, 0);
        Ok(Self::with_buffer(buffer, sample_rate))
    }

    fn with_buffer(buffer: Vec<i16>, sample_rate: f32) -> Self {
        let mut echo = Self {
            buffer,
            write_pos: 0,
            delay_samples: 1,
            time_ms: 250,
            feedback: 50,
            mix: 30,
            sample_rate,
        };
        echo.update_delay();
        echo
    }

    /// Set the delay time in milliseconds (clamped to
    /// [`MIN_ECHO_MS`]–[`MAX_ECHO_MS`]).
    pub fn set_time_ms(&mut self, time_ms: u16) {
        self.time_ms = time_ms.clamp(MIN_ECHO_MS, MAX_ECHO_MS);
        self.update_delay();
    }

    /// Current delay time in milliseconds.
    pub fn time_ms(&self) -> u16 {
        self.time_ms
    }

    /// Set the feedback percentage (clamped to 0–90).
    pub fn set_feedback(&mut self, percent: u8) {
        self.feedback = percent.min(90);
    }

    /// Current feedback percentage.
    pub fn feedback(&self) -> u8 {
        self.feedback
    }

    /// Set the dry/wet mix percentage (clamped to 0–100).
    pub fn set_mix(&mut self, percent: u8) {
        self.mix = percent.min(100);
    }

    /// Current mix percentage.
    pub fn mix(&self) -> u8 {
        self.mix
    }

    /// Delay currently applied, in samples.
    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// Zero the ring and rewind the write cursor. Done on install so a
    /// re-enabled echo never replays a stale tail.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
        self.write_pos = 0;
    }

    fn update_delay(&mut self) {
        let samples = self.sample_rate as usize * usize::from(self.time_ms) / 1000;
        self.delay_samples = samples.min(self.buffer.len() - 1).max(1);
    }

    /// Process one sample in the integer mixing domain.
    ///
    /// Reads the tap `delay_samples` behind the write cursor, stores
    /// `input + feedback% of tap` clamped to `i16`, and returns the
    /// percentage dry/wet blend.
    #[inline]
    pub fn process_sample(&mut self, input: i32) -> i32 {
        let len = self.buffer.len();
        let read_pos = (self.write_pos + len - self.delay_samples) % len;
        let delayed = i32::from(self.buffer[read_pos]);

        let write_val = input + delayed * i32::from(self.feedback) / 100;
        self.buffer[self.write_pos] = write_val.clamp(-32768, 32767) as i16;
        self.write_pos = (self.write_pos + 1) % len;

        input * i32::from(100 - self.mix) / 100 + delayed * i32::from(self.mix) / 100
    }
}

impl Effect for Echo {
    fn process(&mut self, input: f32) -> f32 {
        self.process_sample(input as i32) as f32
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.buffer = vec![0i16; buffer_len(sample_rate)];
        self.write_pos = 0;
        self.update_delay();
    }

    fn reset(&mut self) {
        self.clear();
    }
}
