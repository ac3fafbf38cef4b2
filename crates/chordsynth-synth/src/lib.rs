//! Chordsynth Synth - wavetable chord synthesis engine
//!
//! This crate holds everything that runs on the render thread: waveform
//! tables, the table oscillator, unison detuning, the chord voice mixer and
//! the per-mode render strategies. Nothing here locks or allocates after
//! construction.
//!
//! # Core Components
//!
//! ## Wavetables and Oscillator
//!
//! - [`WaveTables`] - Four 256-entry single-cycle tables built at startup
//! - [`WaveformShape`] - Sine, Triangle, Square, Sawtooth
//! - [`Oscillator`] - Shape selector, scaled lookup, continuous display evaluator
//!
//! ## Voices
//!
//! - [`PhaseAccumulator`] - Table-domain phase with subtractive wrap
//! - [`UnisonConfig`] - 1 to 4 detuned copies per note
//! - [`VoiceMixer`] - Three chord notes x unison, headroom-by-construction mixing
//! - [`ToneVoice`] - Single fixed-frequency voice
//!
//! ## Library
//!
//! - [`chord`] - Static chords ([`chord::CM7`], ...) and progressions ([`chord::JAZZ`], ...)
//!
//! ## Rendering
//!
//! - [`Synth`] - Owns all of the above, renders stereo blocks per [`PlayMode`]
//!
//! # Example
//!
//! ```rust
//! use chordsynth_synth::{PlayMode, Synth, WaveformShape, chord};
//!
//! let mut synth = Synth::new(44100.0, 440.0);
//! synth.set_shape(WaveformShape::Sawtooth);
//! synth.set_chord(&chord::ABMAJ7);
//! synth.mixer_mut().set_unison_count(2);
//!
//! let mut buffer = vec![0i16; 512];
//! synth.render_block(PlayMode::Chord, 0.8, &mut buffer);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! chordsynth-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod chord;
pub mod mixer;
pub mod oscillator;
pub mod phase;
pub mod synth;
pub mod unison;
pub mod wavetable;

pub use chord::{Chord, Progression, find_chord, find_progression};
pub use mixer::{MAX_TOTAL_AMPLITUDE, MAX_VOICES, VoiceMixer};
pub use oscillator::Oscillator;
pub use phase::PhaseAccumulator;
pub use synth::{DEFAULT_TONE_HZ, PlayMode, Synth, ToneVoice, UnknownPlayMode};
pub use unison::{MAX_UNISON, UnisonConfig, cents_to_ratio};
pub use wavetable::{TABLE_AMPLITUDE, TABLE_SIZE, UnknownWaveform, WaveTables, WaveformShape};
