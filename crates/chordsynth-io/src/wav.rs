//! Offline WAV output.

use crate::sink::AudioSink;
use crate::{Error, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Sink writing 16-bit stereo PCM to a WAV file.
///
/// Call [`finalize`](Self::finalize) to write the header lengths; a sink
/// dropped without it leaves hound to finalize on drop and swallow errors.
pub struct WavSink {
    writer: Option<WavWriter<BufWriter<File>>>,
    sample_rate: u32,
    frames: u64,
}

impl WavSink {
    /// Create (or truncate) `path`.
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, spec)?;
        Ok(Self {
            writer: Some(writer),
            sample_rate,
            frames: 0,
        })
    }

    /// Stereo frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Finish the file. Further writes fail.
    pub fn finalize(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for WavSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavSink")
            .field("sample_rate", &self.sample_rate)
            .field("frames", &self.frames)
            .field("finalized", &self.writer.is_none())
            .finish()
    }
}

impl AudioSink for WavSink {
    fn write(&mut self, samples: &[i16]) -> Result<usize> {
        let writer = self.writer.as_mut().ok_or(Error::Disconnected)?;
        for &s in samples {
            writer.write_sample(s)?;
        }
        self.frames += (samples.len() / 2) as u64;
        Ok(std::mem::size_of_val(samples))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}
