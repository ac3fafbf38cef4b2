//! One-line status display with a small waveform scope.

use chordsynth_platform::{ControlSnapshot, PlayMode};
use chordsynth_synth::Oscillator;
use std::f32::consts::TAU;

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Seconds of signal spread across the scope.
const SCOPE_WINDOW: f32 = 0.01;

/// Scope width in characters.
pub const SCOPE_WIDTH: usize = 24;

fn level(value: f32) -> char {
    let scaled = (value.clamp(-1.0, 1.0) + 1.0) * 0.5 * (LEVELS.len() - 1) as f32;
    LEVELS[(scaled.round() as usize).min(LEVELS.len() - 1)]
}

/// Ideal waveform of what is playing, starting at `time` seconds and scaled
/// by the current amplitude.
pub fn scope(snap: &ControlSnapshot, tone_hz: f32, time: f32, width: usize) -> String {
    (0..width)
        .map(|i| {
            let t = time + SCOPE_WINDOW * i as f32 / width.max(1) as f32;
            let value = match snap.mode {
                PlayMode::SingleNote => Oscillator::display_value(snap.waveform, TAU * tone_hz * t),
                PlayMode::Chord | PlayMode::Progression => {
                    snap.chord.display_value(snap.waveform, t)
                }
            };
            level(value * snap.amplitude.value)
        })
        .collect()
}

/// Status line for `snap` at `time` seconds.
pub fn status_line(snap: &ControlSnapshot, tone_hz: f32, time: f32) -> String {
    let playing = match snap.mode {
        PlayMode::SingleNote => format!("{tone_hz:.0} Hz"),
        PlayMode::Chord => snap.chord.to_string(),
        PlayMode::Progression => format!(
            "{} {}/{} {}",
            snap.progression.name,
            snap.progression_index + 1,
            snap.progression.len(),
            snap.chord
        ),
    };
    format!(
        "{:<11} {:<4} x{} {:>4.1}c {:>3}% {} {}",
        snap.mode.name(),
        snap.waveform.short_name(),
        snap.unison_count,
        snap.detune_cents,
        snap.amplitude.percent,
        scope(snap, tone_hz, time, SCOPE_WIDTH),
        playing
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordsynth_platform::{Amplitude, ControlEvent, ControlState};
    use std::time::Duration;

    #[test]
    fn level_spans_the_range() {
        assert_eq!(level(-1.0), '▁');
        assert_eq!(level(1.0), '█');
        assert_eq!(level(5.0), '█');
        assert_eq!(level(0.0), '▅');
    }

    #[test]
    fn silent_scope_is_flat() {
        let mut snap = ControlSnapshot::default();
        snap.amplitude = Amplitude::SILENT;
        let line = scope(&snap, 440.0, 0.3, 16);
        assert_eq!(line.chars().count(), 16);
        assert!(line.chars().all(|c| c == '▅'));
    }

    #[test]
    fn chord_line_names_the_chord() {
        let mut state = ControlState::default();
        state.apply(ControlEvent::SetMode(PlayMode::Chord), Duration::ZERO);
        state.amplitude = Amplitude::from_normalized(0.5);
        let line = status_line(&state.snapshot(), 440.0, 0.0);
        assert!(line.starts_with("chord"));
        assert!(line.contains("Cm7"));
        assert!(line.contains(" 50%"));
    }

    #[test]
    fn progression_line_shows_step() {
        let mut state = ControlState::default();
        state.apply(ControlEvent::SetMode(PlayMode::Progression), Duration::ZERO);
        state.advance_progression(Duration::from_millis(1600), Duration::from_millis(1600));
        let line = status_line(&state.snapshot(), 440.0, 0.0);
        assert!(line.contains("jazz 2/4 Cm7"), "{line}");
    }
}
