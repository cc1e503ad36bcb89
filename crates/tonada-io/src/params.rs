//! Scalar parameters shared between the control surface and the render
//! context.
//!
//! Everything here is read once per sample by the audio side, so each
//! field is a lone atomic: `f32` values travel bit-cast through
//! [`AtomicU32`], written release and read acquire. Anything that must
//! not tear across fields (waveform changes, effect installation) goes
//! through the engine command queue instead.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Debug)]
pub(crate) struct SharedParams {
    /// Master volume, 0-255.
    volume: AtomicU32,
    lfo_enabled: AtomicBool,
    vibrato: AtomicBool,
    tremolo: AtomicBool,
    /// LFO rate in Hz, stored as `f32` bits.
    lfo_rate_bits: AtomicU32,
    /// LFO depth in percent, 0-100.
    lfo_depth: AtomicU32,
}

impl SharedParams {
    pub(crate) fn new() -> Self {
        Self {
            volume: AtomicU32::new(200),
            lfo_enabled: AtomicBool::new(false),
            vibrato: AtomicBool::new(false),
            tremolo: AtomicBool::new(false),
            lfo_rate_bits: AtomicU32::new(5.0f32.to_bits()),
            lfo_depth: AtomicU32::new(20),
        }
    }

    pub(crate) fn set_volume(&self, volume: u8) {
        self.volume.store(u32::from(volume), Ordering::Release);
    }

    pub(crate) fn volume(&self) -> u8 {
        self.volume.load(Ordering::Acquire) as u8
    }

    pub(crate) fn set_lfo_enabled(&self, enabled: bool) {
        self.lfo_enabled.store(enabled, Ordering::Release);
    }

    pub(crate) fn lfo_enabled(&self) -> bool {
        self.lfo_enabled.load(Ordering::Acquire)
    }

    pub(crate) fn set_vibrato_enabled(&self, enabled: bool) {
        self.vibrato.store(enabled, Ordering::Release);
    }

    pub(crate) fn vibrato_enabled(&self) -> bool {
        self.vibrato.load(Ordering::Acquire)
    }

    pub(crate) fn set_tremolo_enabled(&self, enabled: bool) {
        self.tremolo.store(enabled, Ordering::Release);
    }

    pub(crate) fn tremolo_enabled(&self) -> bool {
        self.tremolo.load(Ordering::Acquire)
    }

    pub(crate) fn set_lfo_rate_hz(&self, rate_hz: f32) {
        let clamped = rate_hz.clamp(0.1, 20.0);
        self.lfo_rate_bits.store(clamped.to_bits(), Ordering::Release);
    }

    pub(crate) fn lfo_rate_bits(&self) -> u32 {
        self.lfo_rate_bits.load(Ordering::Acquire)
    }

    pub(crate) fn lfo_rate_hz(&self) -> f32 {
        f32::from_bits(self.lfo_rate_bits())
    }

    pub(crate) fn set_lfo_depth(&self, percent: u8) {
        self.lfo_depth
            .store(u32::from(percent.min(100)), Ordering::Release);
    }

    pub(crate) fn lfo_depth(&self) -> u8 {
        self.lfo_depth.load(Ordering::Acquire) as u8
    }
}
