//! Audio output layer and render loop for chordsynth.
//!
//! This crate provides:
//!
//! - **Sinks**: the [`AudioSink`] trait with a real-time [`CpalSink`], an
//!   offline [`WavSink`] and a capturing [`MemorySink`]
//! - **Render loop**: [`RenderLoop`], which turns shared control state into
//!   fixed-size stereo buffers and hands them to a sink
//! - **Devices**: [`list_output_devices`] for device discovery
//!
//! ## Quick Start
//!
//! ```rust
//! use chordsynth_io::{MemorySink, RenderConfig, RenderLoop};
//! use chordsynth_platform::{Knob, ManualClock, SharedControl};
//!
//! let control = SharedControl::default();
//! let mut engine = RenderLoop::new(
//!     RenderConfig::default(),
//!     control,
//!     Knob::default(),
//!     ManualClock::new(),
//! );
//! let mut sink = MemorySink::new(44100);
//! engine.render_iteration(&mut sink)?;
//! assert_eq!(sink.frames(), 256);
//! # Ok::<(), chordsynth_io::Error>(())
//! ```

mod cpal_sink;
mod device;
mod engine;
mod sink;
mod wav;

pub use cpal_sink::{CpalSink, OutputConfig};
pub use device::{AudioDevice, list_output_devices};
pub use engine::{RenderConfig, RenderLoop, RenderStats};
pub use sink::{AudioSink, MemorySink};
pub use wav::WavSink;

/// Error types for audio output operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The other end of the output queue is gone.
    #[error("Audio output disconnected")]
    Disconnected,

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio output operations.
pub type Result<T> = std::result::Result<T, Error>;
