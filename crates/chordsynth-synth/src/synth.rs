//! Per-mode render strategies.
//!
//! [`Synth`] owns the oscillator tables, the chord [`VoiceMixer`] and a
//! single [`ToneVoice`], and renders interleaved stereo blocks for the
//! active [`PlayMode`].

use crate::chord::Chord;
use crate::mixer::VoiceMixer;
use crate::oscillator::Oscillator;
use crate::phase::PhaseAccumulator;
use crate::wavetable::WaveformShape;
use core::fmt;
use core::str::FromStr;

/// Default single-note frequency (A4).
pub const DEFAULT_TONE_HZ: f32 = 440.0;

/// What the render loop plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// One oscillator voice at a fixed tone frequency.
    #[default]
    SingleNote,
    /// Static chord through the voice mixer.
    Chord,
    /// Chord progression advancing at a fixed interval.
    Progression,
}

impl PlayMode {
    /// All modes in cycling order.
    pub const ALL: [PlayMode; 3] = [PlayMode::SingleNote, PlayMode::Chord, PlayMode::Progression];

    /// Next mode in cycling order (wraps back to SingleNote).
    pub const fn next(self) -> Self {
        match self {
            PlayMode::SingleNote => PlayMode::Chord,
            PlayMode::Chord => PlayMode::Progression,
            PlayMode::Progression => PlayMode::SingleNote,
        }
    }

    /// True for modes rendered through the voice mixer.
    pub const fn uses_mixer(self) -> bool {
        matches!(self, PlayMode::Chord | PlayMode::Progression)
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            PlayMode::SingleNote => "single",
            PlayMode::Chord => "chord",
            PlayMode::Progression => "progression",
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a play mode name is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownPlayMode;

impl fmt::Display for UnknownPlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown play mode (expected single, chord or progression)")
    }
}

impl FromStr for PlayMode {
    type Err = UnknownPlayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let is = |name: &str| s.eq_ignore_ascii_case(name);
        if is("single") || is("single-note") || is("note") {
            Ok(PlayMode::SingleNote)
        } else if is("chord") {
            Ok(PlayMode::Chord)
        } else if is("progression") || is("prog") {
            Ok(PlayMode::Progression)
        } else {
            Err(UnknownPlayMode)
        }
    }
}

/// Single oscillator voice at full table amplitude.
#[derive(Debug, Clone, Copy)]
pub struct ToneVoice {
    phase: PhaseAccumulator,
    frequency: f32,
}

impl ToneVoice {
    /// Create a tone voice at `frequency` Hz.
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        let mut phase = PhaseAccumulator::new();
        phase.set_frequency(frequency, sample_rate);
        Self { phase, frequency }
    }

    /// Tone frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Produce one sample from the oscillator's current shape.
    #[inline]
    pub fn next_sample(&mut self, osc: &Oscillator) -> i16 {
        let index = self.phase.tick();
        osc.sample(osc.shape(), index)
    }

    /// Return the phase to 0.
    pub fn reset(&mut self) {
        self.phase.reset();
    }
}

/// Oscillator, chord mixer and tone voice under one owner.
///
/// # Example
///
/// ```rust
/// use chordsynth_synth::{PlayMode, Synth, WaveformShape};
///
/// let mut synth = Synth::new(44100.0, 440.0);
/// synth.set_shape(WaveformShape::Triangle);
///
/// let mut buffer = [0i16; 512]; // 256 stereo frames
/// synth.render_block(PlayMode::Chord, 0.5, &mut buffer);
/// assert!(buffer.chunks(2).all(|f| f[0] == f[1]));
/// ```
#[derive(Debug, Clone)]
pub struct Synth {
    osc: Oscillator,
    mixer: VoiceMixer,
    tone: ToneVoice,
}

impl Synth {
    /// Build tables and voices for `sample_rate`, with a tone at `tone_hz`.
    pub fn new(sample_rate: f32, tone_hz: f32) -> Self {
        Self {
            osc: Oscillator::new(),
            mixer: VoiceMixer::new(sample_rate),
            tone: ToneVoice::new(tone_hz, sample_rate),
        }
    }

    /// Oscillator (tables and shape selector).
    pub fn oscillator(&self) -> &Oscillator {
        &self.osc
    }

    /// Chord mixer.
    pub fn mixer(&self) -> &VoiceMixer {
        &self.mixer
    }

    /// Chord mixer, mutable.
    pub fn mixer_mut(&mut self) -> &mut VoiceMixer {
        &mut self.mixer
    }

    /// Tone voice used in single-note mode.
    pub fn tone(&self) -> &ToneVoice {
        &self.tone
    }

    /// Select the waveform for every voice.
    pub fn set_shape(&mut self, shape: WaveformShape) {
        self.osc.set_shape(shape);
    }

    /// Switch the mixer chord if it differs from the current one.
    ///
    /// Returns `true` when the chord changed.
    pub fn set_chord(&mut self, chord: &'static Chord) -> bool {
        if core::ptr::eq(self.mixer.chord(), chord) {
            return false;
        }
        self.mixer.set_chord(chord);
        true
    }

    /// Reset every voice phase. Called on play mode transitions.
    pub fn reset(&mut self) {
        self.mixer.reset();
        self.tone.reset();
    }

    /// One mono sample for `mode`.
    #[inline]
    pub fn next_sample(&mut self, mode: PlayMode) -> i16 {
        match mode {
            PlayMode::SingleNote => self.tone.next_sample(&self.osc),
            PlayMode::Chord | PlayMode::Progression => self.mixer.next_sample(&self.osc),
        }
    }

    /// Fill an interleaved stereo buffer, scaling by `amplitude`.
    ///
    /// Every frame gets the same value on both channels. `amplitude` is
    /// clamped to `0.0..=1.0`. A trailing odd sample is left untouched.
    pub fn render_block(&mut self, mode: PlayMode, amplitude: f32, out: &mut [i16]) {
        let amplitude = amplitude.clamp(0.0, 1.0);
        for frame in out.chunks_exact_mut(2) {
            let sample = (f32::from(self.next_sample(mode)) * amplitude) as i16;
            frame[0] = sample;
            frame[1] = sample;
        }
    }
}
