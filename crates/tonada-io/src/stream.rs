//! Live playback via cpal.
//!
//! [`OutputStream`] runs the engine on a dedicated render thread that
//! pushes fixed-size blocks into a bounded queue; the device callback
//! drains the queue and converts to the device's float format. The
//! queue depth is the only elasticity between the two clocks: a full
//! queue blocks the renderer (backpressure), an empty one makes the
//! callback emit silence and count an underrun.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{SyncSender, sync_channel};
use std::thread::JoinHandle;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host};
use tonada_config::Profile;
use tracing::{error, info, warn};

use crate::engine::AudioEngine;
use crate::sink::SampleSink;
use crate::{Error, Result};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Output device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
}

/// Live stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Engine sample rate in Hz.
    pub sample_rate: u32,
    /// Render block size in frames.
    pub buffer_size: u32,
    /// Depth of the block queue between renderer and device.
    pub num_buffers: usize,
    /// Output device name or index (default device if `None`).
    pub device: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            buffer_size: 128,
            num_buffers: 4,
            device: None,
        }
    }
}

impl From<&Profile> for StreamConfig {
    fn from(profile: &Profile) -> Self {
        Self {
            sample_rate: profile.sample_rate,
            buffer_size: profile.backend.buffer_size,
            num_buffers: profile.backend.num_buffers as usize,
            device: profile.backend.device.clone(),
        }
    }
}

/// List the available output devices.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device) {
                let (default_sample_rate, channels) = device
                    .default_output_config()
                    .map(|c| (c.sample_rate(), c.channels()))
                    .unwrap_or((48000, 2));

                devices.push(AudioDevice {
                    name,
                    default_sample_rate,
                    channels,
                });
            }
        }
    }

    Ok(devices)
}

/// The system default output device, if any.
pub fn default_output_device() -> Result<Option<AudioDevice>> {
    let host = cpal::default_host();
    Ok(host.default_output_device().and_then(|device| {
        device_name(&device).ok().map(|name| {
            let (default_sample_rate, channels) = device
                .default_output_config()
                .map(|c| (c.sample_rate(), c.channels()))
                .unwrap_or((48000, 2));
            AudioDevice {
                name,
                default_sample_rate,
                channels,
            }
        })
    }))
}

/// Find an output device by index, exact name, or case-insensitive
/// partial name, in that order.
fn find_output_device(host: &Host, name_or_index: &str) -> Result<Device> {
    let devices: Vec<_> = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .collect();

    if let Ok(index) = name_or_index.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "output device index {} (only {} devices available)",
                index,
                devices.len()
            ))
        });
    }

    for device in &devices {
        if device_name(device).is_ok_and(|n| n == name_or_index) {
            return Ok(device.clone());
        }
    }

    let search_lower = name_or_index.to_lowercase();
    for device in &devices {
        if device_name(device).is_ok_and(|n| n.to_lowercase().contains(&search_lower)) {
            return Ok(device.clone());
        }
    }

    Err(Error::DeviceNotFound(name_or_index.to_string()))
}

/// Feeds rendered blocks into the bounded queue. A full queue blocks
/// the renderer until the device callback catches up.
pub(crate) struct ChannelSink {
    tx: SyncSender<Vec<i16>>,
}

impl SampleSink for ChannelSink {
    fn push(&mut self, block: &[i16]) -> crate::Result<()> {
        self.tx
            .send(block.to_vec())
            .map_err(|_| Error::Stream("block queue closed".into()))
    }
}

/// A running live output stream.
///
/// Owns the render thread and the cpal stream; dropping it stops both.
pub struct OutputStream {
    running: Arc<AtomicBool>,
    underruns: Arc<AtomicU64>,
    render_thread: Option<JoinHandle<()>>,
    _stream: cpal::Stream,
    sample_rate: u32,
}

impl OutputStream {
    /// Starts playback of `engine` on the configured device.
    ///
    /// The block queue is primed before the device starts so the first
    /// callback never runs on an empty pipe. The engine renders mono;
    /// the callback duplicates each sample across the device channels.
    ///
    /// # Errors
    ///
    /// Fails when the device cannot be found or the stream cannot be
    /// built or started.
    pub fn start(mut engine: AudioEngine, config: &StreamConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = match &config.device {
            Some(name) => find_output_device(&host, name)?,
            None => host.default_output_device().ok_or(Error::NoDevice)?,
        };

        let channels = device
            .default_output_config()
            .map(|c| c.channels())
            .unwrap_or(2);

        let buffer_size = config.buffer_size.max(1);
        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(buffer_size),
        };

        let depth = config.num_buffers.max(1);
        let (block_tx, block_rx) = sync_channel::<Vec<i16>>(depth);
        let running = Arc::new(AtomicBool::new(true));
        let underruns = Arc::new(AtomicU64::new(0));

        // Prime the queue so the device never starts on an empty pipe.
        // The queue holds exactly `depth` blocks, so none of these
        // sends can block.
        let mut sink = ChannelSink { tx: block_tx };
        let mut block = vec![0i16; buffer_size as usize];
        for _ in 0..depth {
            engine.render_block(&mut block);
            sink.push(&block)?;
        }

        let render_running = Arc::clone(&running);
        let render_thread = std::thread::spawn(move || {
            while render_running.load(Ordering::SeqCst) {
                engine.render_block(&mut block);
                if sink.push(&block).is_err() {
                    break;
                }
            }
        });

        let callback_running = Arc::clone(&running);
        let callback_underruns = Arc::clone(&underruns);
        let channel_count = usize::from(channels);
        let mut pending: Vec<i16> = Vec::new();
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !callback_running.load(Ordering::SeqCst) {
                        // Keep draining so a renderer blocked on a full
                        // queue can wind down and be joined.
                        while block_rx.try_recv().is_ok() {}
                        data.fill(0.0);
                        return;
                    }

                    let frames_needed = data.len() / channel_count;
                    while pending.len() < frames_needed {
                        match block_rx.try_recv() {
                            Ok(block) => pending.extend(block),
                            Err(_) => break,
                        }
                    }

                    if pending.len() < frames_needed {
                        data.fill(0.0);
                        if callback_underruns.fetch_add(1, Ordering::Relaxed) == 0 {
                            warn!("output stream underrun; renderer is not keeping up");
                        }
                        return;
                    }

                    for (frame, sample) in data
                        .chunks_mut(channel_count)
                        .zip(pending.drain(..frames_needed))
                    {
                        frame.fill(f32::from(sample) / 32768.0);
                    }
                },
                move |err| {
                    error!(error = %err, "output stream error");
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        info!(
            sample_rate = config.sample_rate,
            buffer_size,
            num_buffers = depth,
            channels,
            "output stream started"
        );

        Ok(Self {
            running,
            underruns,
            render_thread: Some(render_thread),
            _stream: stream,
            sample_rate: config.sample_rate,
        })
    }

    /// Stops the stream and joins the render thread. Safe to call more
    /// than once.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.render_thread.take()
            && handle.join().is_err()
        {
            error!("render thread panicked");
        }
        info!(
            underruns = self.underruns.load(Ordering::Relaxed),
            "output stream stopped"
        );
    }

    /// Whether the stream is still producing audio.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Device callbacks that found the block queue empty.
    #[must_use]
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    /// Stream sample rate in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for OutputStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_config_defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.sample_rate, 22050);
        assert_eq!(config.buffer_size, 128);
        assert_eq!(config.num_buffers, 4);
        assert!(config.device.is_none());
    }

    #[test]
    fn test_stream_config_from_profile() {
        let mut profile = Profile::new("live");
        profile.sample_rate = 44100;
        profile.backend.buffer_size = 256;
        profile.backend.num_buffers = 3;
        profile.backend.device = Some("USB".to_string());

        let config = StreamConfig::from(&profile);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.buffer_size, 256);
        assert_eq!(config.num_buffers, 3);
        assert_eq!(config.device.as_deref(), Some("USB"));
    }

    #[test]
    fn test_list_devices() {
        // Availability depends on the system; this must not panic.
        let result = list_devices();
        assert!(result.is_ok());
    }

    #[test]
    fn test_find_device_bad_index() {
        let host = cpal::default_host();
        assert!(find_output_device(&host, "10000").is_err());
    }

    #[test]
    fn test_find_device_no_match() {
        let host = cpal::default_host();
        let result = find_output_device(&host, "no-such-output-device-name");
        assert!(result.is_err());
    }
}
