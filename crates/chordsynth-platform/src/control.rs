//! Control state shared between the render and control threads.
//!
//! [`ControlState`] is the single source of truth for everything a user can
//! change while audio is running. It lives behind a [`SharedControl`], a
//! mutex that both threads only ever acquire with a deadline. The render
//! thread copies a [`ControlSnapshot`] once per buffer and keeps its previous
//! snapshot when the deadline passes.

use crate::smoothing::Amplitude;
use chordsynth_synth::chord::{self, CHORDS, CM7, JAZZ};
use chordsynth_synth::unison::{DEFAULT_DETUNE_CENTS, MAX_DETUNE_CENTS, MAX_UNISON};
use chordsynth_synth::{Chord, PlayMode, Progression, WaveformShape};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::time::Duration;

/// User-facing change applied to [`ControlState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Sine -> Triangle -> Square -> Sawtooth -> Sine.
    CycleWaveform,
    /// Select a waveform directly.
    SetWaveform(WaveformShape),
    /// SingleNote -> Chord -> Progression -> SingleNote.
    CycleMode,
    /// Select a play mode directly.
    SetMode(PlayMode),
    /// Unison voices per note (clamped to 1..=4).
    SetUnisonCount(usize),
    /// Unison base detune in cents (clamped to 0..=50).
    SetDetuneCents(f32),
    /// Step to the next chord of the library (Chord mode).
    NextChord,
}

/// Per-buffer copy of the fields the render loop and visualizer read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSnapshot {
    /// Smoothed amplitude.
    pub amplitude: Amplitude,
    /// Active play mode.
    pub mode: PlayMode,
    /// Active waveform.
    pub waveform: WaveformShape,
    /// Chord to play in Chord and Progression modes.
    pub chord: &'static Chord,
    /// Unison voices per note.
    pub unison_count: usize,
    /// Unison base detune in cents.
    pub detune_cents: f32,
    /// Active progression.
    pub progression: &'static Progression,
    /// Current step within the progression.
    pub progression_index: usize,
}

impl Default for ControlSnapshot {
    /// Fallback used before the first successful read: full amplitude,
    /// single-note mode.
    fn default() -> Self {
        ControlState::default().snapshot_with(Amplitude::FULL)
    }
}

/// Mutable control state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Smoothed amplitude stored by the render thread.
    pub amplitude: Amplitude,
    /// Active play mode.
    pub mode: PlayMode,
    /// Active waveform.
    pub waveform: WaveformShape,
    /// Chord currently playing in Chord and Progression modes.
    pub chord: &'static Chord,
    /// Index into [`CHORDS`] of the library chord selected for Chord mode.
    pub chord_index: usize,
    /// Unison voices per note.
    pub unison_count: usize,
    /// Unison base detune in cents.
    pub detune_cents: f32,
    /// Active progression.
    pub progression: &'static Progression,
    /// Current step within the progression.
    pub progression_index: usize,
    /// Time of the last progression step.
    pub last_advance: Duration,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(&CM7, &JAZZ)
    }
}

impl ControlState {
    /// Single-note state selecting `chord` for Chord mode and `progression`
    /// for Progression mode.
    pub fn new(chord: &'static Chord, progression: &'static Progression) -> Self {
        Self {
            amplitude: Amplitude::SILENT,
            mode: PlayMode::SingleNote,
            waveform: WaveformShape::Sine,
            chord,
            chord_index: chord::chord_index(chord).unwrap_or(0),
            unison_count: 1,
            detune_cents: DEFAULT_DETUNE_CENTS,
            progression,
            progression_index: 0,
            last_advance: Duration::ZERO,
        }
    }

    /// Copy the render-relevant fields.
    pub fn snapshot(&self) -> ControlSnapshot {
        self.snapshot_with(self.amplitude)
    }

    fn snapshot_with(&self, amplitude: Amplitude) -> ControlSnapshot {
        ControlSnapshot {
            amplitude,
            mode: self.mode,
            waveform: self.waveform,
            chord: self.chord,
            unison_count: self.unison_count,
            detune_cents: self.detune_cents,
            progression: self.progression,
            progression_index: self.progression_index,
        }
    }

    /// Apply one control event at time `now`.
    pub fn apply(&mut self, event: ControlEvent, now: Duration) {
        match event {
            ControlEvent::CycleWaveform => self.waveform = self.waveform.next(),
            ControlEvent::SetWaveform(shape) => self.waveform = shape,
            ControlEvent::CycleMode => self.enter_mode(self.mode.next(), now),
            ControlEvent::SetMode(mode) => {
                if mode != self.mode {
                    self.enter_mode(mode, now);
                }
            }
            ControlEvent::SetUnisonCount(n) => self.unison_count = n.clamp(1, MAX_UNISON),
            ControlEvent::SetDetuneCents(c) => {
                self.detune_cents = if c.is_nan() {
                    self.detune_cents
                } else {
                    c.clamp(0.0, MAX_DETUNE_CENTS)
                };
            }
            ControlEvent::NextChord => {
                self.chord_index = (self.chord_index + 1) % CHORDS.len();
                if self.mode != PlayMode::Progression {
                    self.chord = CHORDS[self.chord_index];
                }
            }
        }
    }

    /// Switch mode, restarting the progression when entering Progression.
    fn enter_mode(&mut self, mode: PlayMode, now: Duration) {
        self.mode = mode;
        match mode {
            PlayMode::Progression => {
                self.progression_index = 0;
                self.last_advance = now;
                if let Some(first) = self.progression.get(0) {
                    self.chord = first;
                }
            }
            PlayMode::Chord | PlayMode::SingleNote => {
                self.chord = CHORDS[self.chord_index % CHORDS.len()];
            }
        }
    }

    /// Step the progression when `interval` has elapsed since the last step.
    ///
    /// Returns the new index when a step happened. Does nothing outside
    /// Progression mode. The anchor moves to `now`, so a late call delays
    /// every following step by the same amount.
    pub fn advance_progression(&mut self, now: Duration, interval: Duration) -> Option<usize> {
        if self.mode != PlayMode::Progression || self.progression.is_empty() {
            return None;
        }
        if now.saturating_sub(self.last_advance) < interval {
            return None;
        }
        self.progression_index = (self.progression_index + 1) % self.progression.len();
        self.last_advance = now;
        if let Some(chord) = self.progression.get(self.progression_index) {
            self.chord = chord;
        }
        Some(self.progression_index)
    }
}

/// [`ControlState`] behind a mutex acquired with deadlines.
///
/// Clones share the same state.
///
/// # Example
///
/// ```rust
/// use chordsynth_platform::{ControlEvent, PlayMode, SharedControl};
/// use std::time::Duration;
///
/// let control = SharedControl::default();
/// let timeout = Duration::from_millis(10);
/// assert!(control.apply(ControlEvent::CycleMode, Duration::ZERO, timeout));
/// let snap = control.snapshot(timeout).unwrap();
/// assert_eq!(snap.mode, PlayMode::Chord);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedControl {
    inner: Arc<Mutex<ControlState>>,
}

impl SharedControl {
    /// Share `state`.
    pub fn new(state: ControlState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Run `f` under the lock, or return `None` if it was not acquired
    /// within `timeout`.
    pub fn with_state<R>(
        &self,
        timeout: Duration,
        f: impl FnOnce(&mut ControlState) -> R,
    ) -> Option<R> {
        let mut guard = self.inner.try_lock_for(timeout)?;
        Some(f(&mut guard))
    }

    /// Copy the state for one buffer.
    pub fn snapshot(&self, timeout: Duration) -> Option<ControlSnapshot> {
        self.with_state(timeout, |s| s.snapshot())
    }

    /// Apply a control event. Returns `false` if the lock timed out.
    pub fn apply(&self, event: ControlEvent, now: Duration, timeout: Duration) -> bool {
        let applied = self.with_state(timeout, |s| s.apply(event, now)).is_some();
        if !applied {
            tracing::warn!(?event, "control event dropped, state lock busy");
        }
        applied
    }

    /// Store a freshly smoothed amplitude. Returns `false` if the lock timed
    /// out.
    pub fn store_amplitude(&self, amplitude: Amplitude, timeout: Duration) -> bool {
        self.with_state(timeout, |s| s.amplitude = amplitude).is_some()
    }

    /// Step the progression if due. `None` when no step happened or the lock
    /// timed out.
    pub fn advance_progression(
        &self,
        now: Duration,
        interval: Duration,
        timeout: Duration,
    ) -> Option<usize> {
        self.with_state(timeout, |s| s.advance_progression(now, interval))
            .flatten()
    }

    /// Block until the lock is held.
    ///
    /// Only for threads without a deadline, such as setup code and tests.
    pub fn lock(&self) -> MutexGuard<'_, ControlState> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordsynth_synth::chord::{ABMAJ7, EBMAJ7, FMAJ7, II_V_I};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn default_is_single_note_sine() {
        let s = ControlState::default();
        assert_eq!(s.mode, PlayMode::SingleNote);
        assert_eq!(s.waveform, WaveformShape::Sine);
        assert_eq!(s.unison_count, 1);
        assert_eq!(s.detune_cents, 7.0);
        assert_eq!(s.chord.name, "Cm7");
    }

    #[test]
    fn fallback_snapshot_is_full_single_note() {
        let snap = ControlSnapshot::default();
        assert_eq!(snap.amplitude, Amplitude::FULL);
        assert_eq!(snap.mode, PlayMode::SingleNote);
    }

    #[test]
    fn waveform_cycles() {
        let mut s = ControlState::default();
        for expected in [
            WaveformShape::Triangle,
            WaveformShape::Square,
            WaveformShape::Sawtooth,
            WaveformShape::Sine,
        ] {
            s.apply(ControlEvent::CycleWaveform, Duration::ZERO);
            assert_eq!(s.waveform, expected);
        }
    }

    #[test]
    fn unison_and_detune_are_clamped() {
        let mut s = ControlState::default();
        s.apply(ControlEvent::SetUnisonCount(9), Duration::ZERO);
        assert_eq!(s.unison_count, 4);
        s.apply(ControlEvent::SetUnisonCount(0), Duration::ZERO);
        assert_eq!(s.unison_count, 1);
        s.apply(ControlEvent::SetDetuneCents(120.0), Duration::ZERO);
        assert_eq!(s.detune_cents, 50.0);
        s.apply(ControlEvent::SetDetuneCents(f32::NAN), Duration::ZERO);
        assert_eq!(s.detune_cents, 50.0);
    }

    #[test]
    fn entering_progression_restarts_it() {
        let mut s = ControlState::default();
        s.apply(ControlEvent::SetMode(PlayMode::Progression), ms(500));
        assert_eq!(s.progression_index, 0);
        assert_eq!(s.last_advance, ms(500));
        assert!(core::ptr::eq(s.chord, &EBMAJ7));

        assert_eq!(s.advance_progression(ms(2100), ms(1600)), Some(1));
        s.apply(ControlEvent::CycleMode, ms(2200));
        assert_eq!(s.mode, PlayMode::SingleNote);
        s.apply(ControlEvent::CycleMode, ms(2300));
        s.apply(ControlEvent::CycleMode, ms(2400));
        assert_eq!(s.mode, PlayMode::Progression);
        assert_eq!(s.progression_index, 0);
        assert_eq!(s.last_advance, ms(2400));
    }

    #[test]
    fn progression_steps_every_interval_and_wraps() {
        let mut s = ControlState::default();
        s.apply(ControlEvent::SetMode(PlayMode::Progression), Duration::ZERO);

        assert_eq!(s.advance_progression(ms(1599), ms(1600)), None);
        assert_eq!(s.advance_progression(ms(1600), ms(1600)), Some(1));
        assert_eq!(s.chord.name, "Cm7");
        assert_eq!(s.advance_progression(ms(3200), ms(1600)), Some(2));
        assert!(core::ptr::eq(s.chord, &ABMAJ7));
        assert_eq!(s.advance_progression(ms(4800), ms(1600)), Some(3));
        assert_eq!(s.advance_progression(ms(6400), ms(1600)), Some(0));
        assert!(core::ptr::eq(s.chord, &EBMAJ7));
    }

    #[test]
    fn progression_does_not_step_in_other_modes() {
        let mut s = ControlState::default();
        assert_eq!(s.advance_progression(ms(10_000), ms(1600)), None);
        s.apply(ControlEvent::SetMode(PlayMode::Chord), Duration::ZERO);
        assert_eq!(s.advance_progression(ms(10_000), ms(1600)), None);
    }

    #[test]
    fn next_chord_walks_library() {
        let mut s = ControlState::new(&FMAJ7, &II_V_I);
        s.apply(ControlEvent::SetMode(PlayMode::Chord), Duration::ZERO);
        assert!(core::ptr::eq(s.chord, &FMAJ7));
        s.apply(ControlEvent::NextChord, Duration::ZERO);
        assert!(core::ptr::eq(s.chord, CHORDS[0]));
    }

    #[test]
    fn next_chord_in_progression_only_moves_selection() {
        let mut s = ControlState::default();
        s.apply(ControlEvent::SetMode(PlayMode::Progression), Duration::ZERO);
        let playing = s.chord;
        s.apply(ControlEvent::NextChord, Duration::ZERO);
        assert!(core::ptr::eq(s.chord, playing));
        assert_eq!(s.chord_index, 1);
    }

    #[test]
    fn shared_snapshot_times_out_while_locked() {
        let control = SharedControl::default();
        let guard = control.lock();
        assert!(control.snapshot(Duration::from_millis(1)).is_none());
        assert!(!control.store_amplitude(Amplitude::FULL, Duration::from_millis(1)));
        drop(guard);
        assert!(control.snapshot(Duration::from_millis(1)).is_some());
    }

    #[test]
    fn shared_clones_see_same_state() {
        let a = SharedControl::default();
        let b = a.clone();
        let t = Duration::from_millis(10);
        assert!(a.apply(ControlEvent::SetUnisonCount(3), Duration::ZERO, t));
        assert_eq!(b.snapshot(t).unwrap().unison_count, 3);
    }
}
