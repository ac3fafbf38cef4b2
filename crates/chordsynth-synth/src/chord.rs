//! Static chord and progression library.
//!
//! Chords are three-note voicings spread over octaves 4 to 6 for clarity on
//! small speakers. Everything here is a program constant: the engine holds
//! `&'static Chord` references and never allocates chord data.

use crate::oscillator::Oscillator;
use crate::wavetable::WaveformShape;
use core::f32::consts::TAU;
use core::fmt;

/// Note frequencies in Hz, scientific pitch notation.
pub mod notes {
    #![allow(missing_docs)]

    pub const C4: f32 = 261.63;
    pub const DB4: f32 = 277.18;
    pub const D4: f32 = 293.66;
    pub const EB4: f32 = 311.13;
    pub const E4: f32 = 329.63;
    pub const F4: f32 = 349.23;
    pub const GB4: f32 = 369.99;
    pub const G4: f32 = 392.00;
    pub const AB4: f32 = 415.30;
    pub const A4: f32 = 440.00;
    pub const BB4: f32 = 466.16;
    pub const B4: f32 = 493.88;

    pub const C5: f32 = 523.25;
    pub const DB5: f32 = 554.37;
    pub const D5: f32 = 587.33;
    pub const EB5: f32 = 622.25;
    pub const E5: f32 = 659.25;
    pub const F5: f32 = 698.46;
    pub const GB5: f32 = 739.99;
    pub const G5: f32 = 783.99;
    pub const AB5: f32 = 830.61;
    pub const A5: f32 = 880.00;
    pub const BB5: f32 = 932.33;
    pub const B5: f32 = 987.77;

    pub const C6: f32 = 1046.50;
    pub const DB6: f32 = 1108.73;
    pub const D6: f32 = 1174.66;
    pub const EB6: f32 = 1244.51;
    pub const E6: f32 = 1318.51;
    pub const F6: f32 = 1396.91;
    pub const GB6: f32 = 1479.98;
    pub const G6: f32 = 1567.98;
    pub const AB6: f32 = 1661.22;
    pub const A6: f32 = 1760.00;
    pub const BB6: f32 = 1864.66;
    pub const B6: f32 = 1975.53;
}

/// Number of notes in every chord.
pub const NOTES_PER_CHORD: usize = 3;

/// A named three-note voicing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    /// Display name, e.g. `"Cm7"`.
    pub name: &'static str,
    /// Note frequencies in Hz, lowest voice first.
    pub notes: [f32; NOTES_PER_CHORD],
    /// Human-readable voicing, e.g. `"C4 + Eb5 + Bb5"`.
    pub description: &'static str,
}

impl Chord {
    /// Define a chord.
    pub const fn new(
        name: &'static str,
        notes: [f32; NOTES_PER_CHORD],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            notes,
            description,
        }
    }

    /// Continuous mixed waveform of the chord at `time` seconds.
    ///
    /// Averages the ideal `shape` waveform at each note frequency, giving a
    /// value in [-1.0, 1.0]. This is a pure function of its inputs, so
    /// visualizers can call it from any thread without touching audio state.
    pub fn display_value(&self, shape: WaveformShape, time: f32) -> f32 {
        let sum: f32 = self
            .notes
            .iter()
            .map(|&freq| Oscillator::display_value(shape, TAU * freq * time))
            .sum();
        sum / NOTES_PER_CHORD as f32
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.description)
    }
}

/// A named, looping sequence of chords.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progression {
    /// Lookup name, e.g. `"jazz"`.
    pub name: &'static str,
    /// Chords in playing order. Repeats are allowed.
    pub chords: &'static [&'static Chord],
}

impl Progression {
    /// Number of steps in the progression.
    #[inline]
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// True if the progression has no steps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Chord at `index`, or `None` out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'static Chord> {
        self.chords.get(index).copied()
    }
}

/// C minor 7, wide voicing.
pub static CM7: Chord = Chord::new(
    "Cm7",
    [notes::C4, notes::EB5, notes::BB5],
    "C4 + Eb5 + Bb5 (wide voicing)",
);

/// E-flat major 7.
pub static EBMAJ7: Chord = Chord::new("Ebmaj7", [notes::EB5, notes::G5, notes::D6], "Eb5 + G5 + D6");

/// A-flat major 7.
pub static ABMAJ7: Chord = Chord::new("Abmaj7", [notes::AB5, notes::C6, notes::G6], "Ab5 + C6 + G6");

/// G major 7.
pub static GMAJ7: Chord = Chord::new("Gmaj7", [notes::G4, notes::B5, notes::GB6], "G4 + B5 + F#6");

/// D minor 7.
pub static DM7: Chord = Chord::new("Dm7", [notes::D4, notes::F5, notes::C6], "D4 + F5 + C6");

/// F major 7.
pub static FMAJ7: Chord = Chord::new("Fmaj7", [notes::F4, notes::A5, notes::E6], "F4 + A5 + E6");

/// Every chord in the library, in menu order.
pub static CHORDS: [&Chord; 6] = [&CM7, &EBMAJ7, &ABMAJ7, &GMAJ7, &DM7, &FMAJ7];

/// Ebmaj7 - Cm7 - Abmaj7 - Abmaj7 (Abmaj7 holds for two steps).
pub static JAZZ: Progression = Progression {
    name: "jazz",
    chords: &[&EBMAJ7, &CM7, &ABMAJ7, &ABMAJ7],
};

/// Dm7 - Gmaj7 - Cm7.
pub static II_V_I: Progression = Progression {
    name: "ii-v-i",
    chords: &[&DM7, &GMAJ7, &CM7],
};

/// Every progression in the library.
pub static PROGRESSIONS: [&Progression; 2] = [&JAZZ, &II_V_I];

/// Highest note frequency in [`CHORDS`], before unison detune.
pub fn highest_note() -> f32 {
    CHORDS
        .iter()
        .flat_map(|chord| chord.notes)
        .fold(0.0, f32::max)
}

/// Look up a chord by name (case-insensitive).
pub fn find_chord(name: &str) -> Option<&'static Chord> {
    CHORDS
        .iter()
        .copied()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Position of a chord in [`CHORDS`], compared by name.
pub fn chord_index(chord: &Chord) -> Option<usize> {
    CHORDS.iter().position(|c| c.name == chord.name)
}

/// Look up a progression by name (case-insensitive).
pub fn find_progression(name: &str) -> Option<&'static Progression> {
    PROGRESSIONS
        .iter()
        .copied()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
