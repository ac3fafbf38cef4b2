//! Chordsynth Platform - state shared between render and control threads
//!
//! The render thread owns all voice state; everything the user can change
//! lives here and crosses threads in exactly two ways:
//!
//! - [`SharedControl`] - [`ControlState`] behind a `parking_lot` mutex that is
//!   only ever acquired with a deadline. The render thread falls back to its
//!   previous [`ControlSnapshot`] when the deadline passes.
//! - [`Knob`] - an atomic raw amplitude reading, smoothed on the render
//!   thread by [`AmplitudeSmoother`].
//!
//! Progression timing reads a [`Clock`]: [`SystemClock`] for live playback,
//! [`ManualClock`] for offline rendering and tests.
//!
//! # Example
//!
//! ```rust
//! use chordsynth_platform::{
//!     AmplitudeSmoother, AmplitudeSource, Clock, ControlEvent, Knob, ManualClock, PlayMode,
//!     SharedControl,
//! };
//! use std::time::Duration;
//!
//! let control = SharedControl::default();
//! let clock = ManualClock::new();
//! let knob = Knob::from_normalized(0.5);
//! let mut smoother = AmplitudeSmoother::new();
//! let timeout = Duration::from_micros(500);
//!
//! control.apply(ControlEvent::SetMode(PlayMode::Progression), clock.now(), timeout);
//! control.store_amplitude(smoother.update(knob.read_raw()), timeout);
//!
//! clock.advance(Duration::from_millis(1600));
//! let step = control.advance_progression(clock.now(), Duration::from_millis(1600), timeout);
//! assert_eq!(step, Some(1));
//! ```

pub mod clock;
pub mod control;
pub mod knob;
pub mod smoothing;

pub use chordsynth_synth::{PlayMode, WaveformShape};
pub use clock::{Clock, ManualClock, SystemClock};
pub use control::{ControlEvent, ControlSnapshot, ControlState, SharedControl};
pub use knob::{AmplitudeSource, Knob};
pub use smoothing::{Amplitude, AmplitudeSmoother};
