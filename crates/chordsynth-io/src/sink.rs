//! Output sink abstraction.

use crate::Result;

/// Destination for rendered audio.
///
/// Receives interleaved stereo `i16` samples (`[L0, R0, L1, R1, ...]`).
/// `write` blocks until the whole buffer is accepted, which is what paces
/// the render loop against a real device.
pub trait AudioSink: Send {
    /// Accept one buffer. Returns the number of bytes accepted.
    fn write(&mut self, samples: &[i16]) -> Result<usize>;

    /// Sample rate the sink expects.
    fn sample_rate(&self) -> u32;

    /// Buffers the consumer found empty so far.
    fn underruns(&self) -> u64 {
        0
    }

    /// Push any buffered data to its destination.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn write(&mut self, samples: &[i16]) -> Result<usize> {
        (**self).write(samples)
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn underruns(&self) -> u64 {
        (**self).underruns()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Sink that keeps every sample in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    samples: Vec<i16>,
    sample_rate: u32,
    writes: usize,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            writes: 0,
        }
    }

    /// Everything written so far, interleaved.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Stereo frames written so far.
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    /// Number of `write` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Left channel of every frame.
    pub fn left(&self) -> impl Iterator<Item = i16> + '_ {
        self.samples.iter().step_by(2).copied()
    }

    /// Drop captured samples.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.writes = 0;
    }

    /// Take the captured samples.
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl AudioSink for MemorySink {
    fn write(&mut self, samples: &[i16]) -> Result<usize> {
        self.samples.extend_from_slice(samples);
        self.writes += 1;
        Ok(std::mem::size_of_val(samples))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_reports_bytes() {
        let mut sink = MemorySink::new(44100);
        assert_eq!(sink.write(&[1, 1, 2, 2]).unwrap(), 8);
        assert_eq!(sink.frames(), 2);
        assert_eq!(sink.left().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(sink.writes(), 1);
        assert_eq!(sink.underruns(), 0);
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut sink: Box<dyn AudioSink> = Box::new(MemorySink::new(48000));
        assert_eq!(sink.sample_rate(), 48000);
        assert_eq!(sink.write(&[0; 512]).unwrap(), 1024);
    }
}
