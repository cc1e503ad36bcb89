//! WAV reading and writing for the integer engine.
//!
//! The engine renders mono 16-bit PCM, so that is the only format
//! written. Reading is permissive: float and other integer depths are
//! rescaled to 16 bits and multi-channel files are mixed down by
//! averaging, so any reasonable WAV can feed the PCM mixer.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};
use tracing::debug;

use crate::Result;

/// Write mono samples as a 16-bit PCM WAV file.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[i16], sample_rate: u32) -> Result<()> {
    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    debug!(
        path = %path.display(),
        samples = samples.len(),
        sample_rate,
        "wrote WAV file"
    );
    Ok(())
}

/// Read a WAV file into mono 16-bit samples, returning them with the
/// file's sample rate.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<i16>, u32)> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels);

    let samples: Vec<i16> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v * 32767.0).clamp(-32768.0, 32767.0) as i16))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            reader
                .into_samples::<i32>()
                .map(|s| {
                    s.map(|v| {
                        let rescaled = if bits > 16 {
                            v >> (bits - 16)
                        } else {
                            v << (16 - bits)
                        };
                        rescaled.clamp(-32768, 32767) as i16
                    })
                })
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    // Mix down to mono if multi-channel
    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| i32::from(s)).sum();
                (sum / chunk.len() as i32) as i16
            })
            .collect()
    } else {
        samples
    };

    Ok((mono, spec.sample_rate))
}
