//! Chord voice mixer.
//!
//! [`VoiceMixer`] plays the three notes of a [`Chord`], each stacked
//! 1 to 4 times for unison, from a fixed arena of phase accumulators.
//!
//! ## Headroom
//!
//! Every voice is read at `MAX_TOTAL_AMPLITUDE / active_voices`, so the sum
//! of all voices can never exceed [`MAX_TOTAL_AMPLITUDE`] even when every
//! voice peaks at once. The sum is accumulated in `i32` and converted back
//! with a saturating clamp that is never expected to engage.
//!
//! | unison | voices | per-voice peak |
//! |--------|--------|----------------|
//! | 1      | 3      | 4666           |
//! | 2      | 6      | 2333           |
//! | 3      | 9      | 1555           |
//! | 4      | 12     | 1166           |

use crate::chord::{CM7, Chord, NOTES_PER_CHORD};
use crate::oscillator::Oscillator;
use crate::phase::PhaseAccumulator;
use crate::unison::{MAX_UNISON, UnisonConfig};
use crate::wavetable::{TABLE_AMPLITUDE, WaveformShape};

/// Maximum simultaneous voices (3 notes x 4 unison).
pub const MAX_VOICES: usize = NOTES_PER_CHORD * MAX_UNISON;

/// Peak of the summed mix.
pub const MAX_TOTAL_AMPLITUDE: i16 = TABLE_AMPLITUDE;

/// Polyphonic chord player with unison.
///
/// Voices are laid out slot-major: voice `slot * NOTES_PER_CHORD + note`
/// plays `chord.notes[note] * ratios[slot]`. Each voice keeps its index
/// when the unison count changes, so phases stay continuous.
///
/// The mixer never locks or allocates; it is owned by the render thread.
///
/// # Example
///
/// ```rust
/// use chordsynth_synth::{Oscillator, VoiceMixer, chord};
///
/// let osc = Oscillator::new();
/// let mut mixer = VoiceMixer::new(44100.0);
/// mixer.set_chord(&chord::EBMAJ7);
/// mixer.set_unison_count(3);
///
/// let mut block = [0i16; 256];
/// for s in block.iter_mut() {
///     *s = mixer.next_sample(&osc);
/// }
/// assert_eq!(mixer.active_voices(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct VoiceMixer {
    voices: [PhaseAccumulator; MAX_VOICES],
    unison: UnisonConfig,
    chord: &'static Chord,
    sample_rate: f32,
}

impl VoiceMixer {
    /// Create a mixer playing Cm7 with a single unison voice.
    pub fn new(sample_rate: f32) -> Self {
        let mut mixer = Self {
            voices: [PhaseAccumulator::new(); MAX_VOICES],
            unison: UnisonConfig::new(),
            chord: &CM7,
            sample_rate,
        };
        mixer.recalculate_phase_increments();
        mixer
    }

    /// Switch to a new chord.
    ///
    /// Phase increments are recomputed; phases are kept so the waveform stays
    /// continuous across the switch.
    pub fn set_chord(&mut self, chord: &'static Chord) {
        self.chord = chord;
        self.recalculate_phase_increments();

        #[cfg(feature = "tracing")]
        tracing::debug!(chord = chord.name, "chord changed");
    }

    /// Switch to step `index` of a progression.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_chord_from_progression(&mut self, index: usize, progression: &[&'static Chord]) {
        if let Some(&chord) = progression.get(index) {
            self.set_chord(chord);
        }
    }

    /// Recompute every voice increment from the chord and unison ratios.
    ///
    /// Idempotent. Must run after any unison change; the unison setters on
    /// this type already do so.
    pub fn recalculate_phase_increments(&mut self) {
        let ratios = self.unison.ratios();
        for (slot, &ratio) in ratios.iter().enumerate() {
            for (note, &freq) in self.chord.notes.iter().enumerate() {
                let inc = PhaseAccumulator::increment_for(freq * ratio, self.sample_rate);
                self.voices[slot * NOTES_PER_CHORD + note].set_increment(inc);
            }
        }
    }

    /// Set the unison voice count (clamped to 1..=4).
    ///
    /// Returns `true` if the count changed; increments are recomputed then.
    pub fn set_unison_count(&mut self, count: usize) -> bool {
        let changed = self.unison.set_voice_count(count);
        if changed {
            self.recalculate_phase_increments();
        }
        changed
    }

    /// Set the unison base detune in cents (clamped to 0..=50).
    ///
    /// Returns `true` if the detune changed; increments are recomputed then.
    pub fn set_detune_cents(&mut self, cents: f32) -> bool {
        let changed = self.unison.set_base_detune_cents(cents);
        if changed {
            self.recalculate_phase_increments();
        }
        changed
    }

    /// Unison configuration.
    pub fn unison(&self) -> &UnisonConfig {
        &self.unison
    }

    /// Number of voices currently summed (3 x unison count).
    #[inline]
    pub fn active_voices(&self) -> usize {
        NOTES_PER_CHORD * self.unison.voice_count()
    }

    /// Peak amplitude allotted to each active voice.
    #[inline]
    pub fn per_voice_amplitude(&self) -> i16 {
        MAX_TOTAL_AMPLITUDE / self.active_voices() as i16
    }

    /// Zero every phase accumulator.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
    }

    /// Produce one mixed sample and advance every active voice.
    ///
    /// Reads the table selected on `osc`. Runs in O(active voices) with no
    /// allocation or locking.
    #[inline]
    pub fn next_sample(&mut self, osc: &Oscillator) -> i16 {
        let active = self.active_voices();
        let per_voice = self.per_voice_amplitude();
        let mut mix: i32 = 0;
        for voice in &mut self.voices[..active] {
            let index = voice.tick();
            mix += i32::from(osc.sample_scaled(index, per_voice));
        }
        mix.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }

    /// Continuous chord waveform at `time` seconds for visualization.
    ///
    /// Does not read or modify the phase accumulators.
    pub fn display_value(&self, shape: WaveformShape, time: f32) -> f32 {
        self.chord.display_value(shape, time)
    }

    /// Active chord.
    #[inline]
    pub fn chord(&self) -> &'static Chord {
        self.chord
    }

    /// Active chord name.
    pub fn chord_name(&self) -> &'static str {
        self.chord.name
    }

    /// Active chord voicing description.
    pub fn chord_description(&self) -> &'static str {
        self.chord.description
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Phase state of voice `index` (slot-major layout).
    pub fn voice(&self, index: usize) -> Option<&PhaseAccumulator> {
        self.voices.get(index)
    }
}
