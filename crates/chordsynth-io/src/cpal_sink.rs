//! Real-time output through cpal.
//!
//! ## Buffer queue
//!
//! ```text
//!  render thread                         cpal callback
//!  ─────────────                         ─────────────
//!  free.recv() ──► fill ──► filled.send() ──► filled.try_recv() ──► play
//!       ▲                                                             │
//!       └──────────────────── free.try_send() ◄───────────────────────┘
//! ```
//!
//! `queue_depth` buffers are allocated once and circulate between the two
//! channels. The render thread blocks on the free channel, so it runs at most
//! `queue_depth` buffers ahead of the device. The callback never blocks,
//! allocates or logs; when no filled buffer is ready it plays silence and
//! bumps an atomic underrun counter.

use crate::device::{device_name, find_output_device};
use crate::sink::AudioSink;
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Longest `write` waits for the device to hand back a buffer.
const STALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Output stream settings.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Stereo frames per buffer.
    pub buffer_frames: usize,
    /// Buffers in flight between render thread and device.
    pub queue_depth: usize,
    /// Device name, partial name or index; host default if `None`.
    pub device: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            buffer_frames: 256,
            queue_depth: 4,
            device: None,
        }
    }
}

/// Render-thread end of the buffer queue.
struct QueueWriter {
    free_rx: Receiver<Vec<i16>>,
    filled_tx: Sender<Vec<i16>>,
}

impl QueueWriter {
    fn write(&self, samples: &[i16], timeout: Duration) -> Result<usize> {
        let mut buf = self.free_rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => Error::Stream("output stalled".to_string()),
            RecvTimeoutError::Disconnected => Error::Disconnected,
        })?;
        buf.clear();
        buf.extend_from_slice(samples);
        self.filled_tx.send(buf).map_err(|_| Error::Disconnected)?;
        Ok(std::mem::size_of_val(samples))
    }
}

/// Callback end of the buffer queue.
struct QueueReader {
    filled_rx: Receiver<Vec<i16>>,
    free_tx: Sender<Vec<i16>>,
    current: Option<Vec<i16>>,
    pos: usize,
    underruns: Arc<AtomicU64>,
}

impl QueueReader {
    /// Fill `out` with queued samples converted to f32, padding with
    /// silence on underrun.
    fn fill(&mut self, out: &mut [f32]) {
        let mut written = 0;
        while written < out.len() {
            if self.current.is_none() {
                match self.filled_rx.try_recv() {
                    Ok(buf) => {
                        self.current = Some(buf);
                        self.pos = 0;
                    }
                    Err(_) => {
                        out[written..].fill(0.0);
                        self.underruns.fetch_add(1, Ordering::Relaxed);
                        return;
                    }
                }
            }
            let Some(buf) = self.current.as_ref() else {
                return;
            };

            let n = (buf.len() - self.pos).min(out.len() - written);
            for (o, &s) in out[written..written + n]
                .iter_mut()
                .zip(&buf[self.pos..self.pos + n])
            {
                *o = i16_to_f32(s);
            }
            self.pos += n;
            written += n;

            if self.pos >= buf.len()
                && let Some(done) = self.current.take()
            {
                // The writer may already be gone during shutdown.
                let _ = self.free_tx.try_send(done);
            }
        }
    }
}

fn buffer_queue(
    depth: usize,
    samples_per_buffer: usize,
    underruns: Arc<AtomicU64>,
) -> (QueueWriter, QueueReader) {
    let depth = depth.max(1);
    let (free_tx, free_rx) = bounded(depth);
    let (filled_tx, filled_rx) = bounded(depth);
    for _ in 0..depth {
        // Channel has exactly `depth` slots.
        let _ = free_tx.send(Vec::with_capacity(samples_per_buffer));
    }
    (
        QueueWriter { free_rx, filled_tx },
        QueueReader {
            filled_rx,
            free_tx,
            current: None,
            pos: 0,
            underruns,
        },
    )
}

#[inline]
fn i16_to_f32(s: i16) -> f32 {
    f32::from(s) / 32768.0
}

/// Type-erased stream kept alive for as long as the sink exists.
struct StreamHandle {
    _inner: Box<dyn Send>,
}

/// Sink playing through a cpal output stream.
///
/// The stream starts on [`open`](Self::open) and stops when the sink is
/// dropped.
pub struct CpalSink {
    writer: QueueWriter,
    underruns: Arc<AtomicU64>,
    stream_errors: Arc<AtomicU64>,
    sample_rate: u32,
    device_name: String,
    _stream: StreamHandle,
}

impl CpalSink {
    /// Open the configured device and start a stereo f32 stream.
    pub fn open(config: &OutputConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = find_output_device(&host, config.device.as_deref())?;
        let name = device_name(&device).unwrap_or_else(|_| "unknown".to_string());

        let stream_config = cpal::StreamConfig {
            channels: 2,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_frames as u32),
        };

        let underruns = Arc::new(AtomicU64::new(0));
        let stream_errors = Arc::new(AtomicU64::new(0));
        let (writer, mut reader) = buffer_queue(
            config.queue_depth,
            config.buffer_frames * 2,
            Arc::clone(&underruns),
        );

        let error_count = Arc::clone(&stream_errors);
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    reader.fill(data);
                },
                move |err| {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(error = %err, "output stream error");
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            device = %name,
            sample_rate = config.sample_rate,
            buffer_frames = config.buffer_frames,
            queue_depth = config.queue_depth,
            "output stream started"
        );

        Ok(Self {
            writer,
            underruns,
            stream_errors,
            sample_rate: config.sample_rate,
            device_name: name,
            _stream: StreamHandle {
                _inner: Box::new(stream),
            },
        })
    }

    /// Name of the device playing this sink.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Errors reported by the stream so far.
    pub fn stream_errors(&self) -> u64 {
        self.stream_errors.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for CpalSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpalSink")
            .field("device", &self.device_name)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl AudioSink for CpalSink {
    fn write(&mut self, samples: &[i16]) -> Result<usize> {
        self.writer.write(samples, STALL_TIMEOUT)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}
