//! Sample delivery and external PCM ingestion.
//!
//! A [`SampleSink`] receives rendered blocks from the engine; the live
//! stream feeds one from its render thread, and [`MemorySink`] collects
//! into a `Vec` for offline rendering and tests. A [`PcmSource`] is the
//! opposite direction: mono PCM pulled into the mixer one block at a
//! time, e.g. from a decoded WAV file.

/// Receives rendered sample blocks.
pub trait SampleSink {
    /// Accepts one block of mono samples.
    ///
    /// # Errors
    ///
    /// Returns an error when the receiving end can no longer accept
    /// samples, e.g. a closed stream.
    fn push(&mut self, block: &[i16]) -> crate::Result<()>;
}

/// Collects rendered samples into memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Vec<i16>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples pushed so far.
    #[must_use]
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Consumes the sink, returning the collected samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl SampleSink for MemorySink {
    fn push(&mut self, block: &[i16]) -> crate::Result<()> {
        self.samples.extend_from_slice(block);
        Ok(())
    }
}

/// Mono PCM pulled into the mix alongside the synthesizer voices.
pub trait PcmSource: Send {
    /// Fills `buf` from the current position, returning how many
    /// samples were written. A short or zero count means the source is
    /// exhausted; the engine treats the remainder as silence.
    fn read(&mut self, buf: &mut [i16]) -> usize;

    /// Repositions the source to `frame_index`. Returns `false` when
    /// the index is out of range, leaving the position unchanged.
    fn seek(&mut self, frame_index: u64) -> bool;
}

/// A [`PcmSource`] over samples already in memory.
#[derive(Debug)]
pub struct BufferedPcm {
    samples: Vec<i16>,
    position: usize,
}

impl BufferedPcm {
    /// Wraps a buffer of mono samples.
    #[must_use]
    pub fn new(samples: Vec<i16>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Samples left before the source is exhausted.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }

    /// Current read position in samples.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl PcmSource for BufferedPcm {
    fn read(&mut self, buf: &mut [i16]) -> usize {
        let count = buf.len().min(self.remaining());
        buf[..count].copy_from_slice(&self.samples[self.position..self.position + count]);
        self.position += count;
        count
    }

    fn seek(&mut self, frame_index: u64) -> bool {
        let Ok(index) = usize::try_from(frame_index) else {
            return false;
        };
        if index > self.samples.len() {
            return false;
        }
        self.position = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_concatenates_blocks() {
        let mut sink = MemorySink::new();
        sink.push(&[1, 2, 3]).unwrap();
        sink.push(&[4, 5]).unwrap();
        assert_eq!(sink.samples(), &[1, 2, 3, 4, 5]);
        assert_eq!(sink.into_samples(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_buffered_pcm_reads_in_blocks() {
        let mut source = BufferedPcm::new(vec![10, 20, 30, 40, 50]);
        let mut buf = [0i16; 3];
        assert_eq!(source.read(&mut buf), 3);
        assert_eq!(buf, [10, 20, 30]);
        assert_eq!(source.remaining(), 2);

        assert_eq!(source.read(&mut buf), 2);
        assert_eq!(&buf[..2], &[40, 50]);
        assert_eq!(source.read(&mut buf), 0);
    }

    #[test]
    fn test_buffered_pcm_seek_bounds() {
        let mut source = BufferedPcm::new(vec![1, 2, 3, 4]);
        assert!(source.seek(2));
        assert_eq!(source.position(), 2);
        // Seeking to the end is allowed; the next read returns zero.
        assert!(source.seek(4));
        let mut buf = [0i16; 4];
        assert_eq!(source.read(&mut buf), 0);
        // Past the end is rejected and the position stays put.
        assert!(!source.seek(5));
        assert_eq!(source.position(), 4);
    }
}
