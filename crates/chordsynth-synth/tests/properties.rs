//! Property-based tests for chordsynth-synth.
//!
//! Checks unison ratio invariants, phase wrapping, scaled lookups and mixer
//! headroom using proptest for randomized configurations.

use chordsynth_synth::chord::CHORDS;
use chordsynth_synth::{
    MAX_TOTAL_AMPLITUDE, Oscillator, PhaseAccumulator, TABLE_SIZE, UnisonConfig, VoiceMixer,
    WaveformShape,
};
use proptest::prelude::*;

fn shape_strategy() -> impl Strategy<Value = WaveformShape> {
    (0usize..4).prop_map(WaveformShape::from_index)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any detune and voice count, the ratio table has the right length,
    /// ascends, and is symmetric around 1.0.
    #[test]
    fn unison_ratios_invariants(
        count in 0usize..8,
        detune in -10.0f32..80.0f32,
    ) {
        let mut config = UnisonConfig::new();
        config.set_base_detune_cents(detune);
        config.set_voice_count(count);

        let n = count.clamp(1, 4);
        let r = config.ratios();
        prop_assert_eq!(r.len(), n);
        prop_assert!(r.windows(2).all(|w| w[0] <= w[1]), "not ascending: {:?}", r);
        for i in 0..n {
            prop_assert!((r[i] * r[n - 1 - i] - 1.0).abs() < 1e-5);
        }
        if n % 2 == 1 {
            prop_assert_eq!(r[n / 2], 1.0);
        }
        prop_assert!((0.0..=50.0).contains(&config.base_detune_cents()));
    }

    /// Wrapped phase stays inside the table for any audible frequency.
    #[test]
    fn phase_stays_in_table(freq in 20.0f32..20000.0f32, steps in 1usize..4000) {
        let mut acc = PhaseAccumulator::new();
        acc.set_frequency(freq, 44100.0);
        for _ in 0..steps {
            let idx = acc.tick();
            prop_assert!(idx < TABLE_SIZE);
        }
        acc.wrap();
        prop_assert!(acc.phase() >= 0.0 && acc.phase() < TABLE_SIZE as f32);
    }

    /// Scaled lookups never exceed the requested peak.
    #[test]
    fn scaled_sample_bounded(
        shape in shape_strategy(),
        index in 0usize..TABLE_SIZE,
        target in 0i16..=14000,
    ) {
        let mut osc = Oscillator::new();
        osc.set_shape(shape);
        let s = osc.sample_scaled(index, target);
        prop_assert!(i32::from(s).abs() <= i32::from(target));
    }

    /// Any chord, shape, unison and detune keeps the mix within budget.
    #[test]
    fn mixer_headroom(
        shape in shape_strategy(),
        chord_idx in 0usize..6,
        unison in 1usize..=4,
        detune in 0.0f32..=50.0f32,
        samples in 1usize..2048,
    ) {
        let mut osc = Oscillator::new();
        osc.set_shape(shape);
        let mut mixer = VoiceMixer::new(44100.0);
        mixer.set_chord(CHORDS[chord_idx]);
        mixer.set_unison_count(unison);
        mixer.set_detune_cents(detune);
        for _ in 0..samples {
            let s = mixer.next_sample(&osc);
            prop_assert!(i32::from(s).abs() <= i32::from(MAX_TOTAL_AMPLITUDE));
        }
    }

    /// The continuous evaluator stays in [-1, 1] for any phase.
    #[test]
    fn display_value_bounded(shape in shape_strategy(), phase in -1000.0f32..1000.0f32) {
        let v = Oscillator::display_value(shape, phase);
        prop_assert!((-1.0..=1.0).contains(&v));
    }
}
