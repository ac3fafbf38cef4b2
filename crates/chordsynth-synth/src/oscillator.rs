//! Wavetable oscillator with waveform selection.
//!
//! The [`Oscillator`] owns the four precomputed [`WaveTables`] and a shape
//! selector. Lookups are integer table reads; the render path reads the
//! selector once per buffer, so shape switches land on buffer boundaries.
//!
//! [`Oscillator::display_value`] evaluates the ideal continuous waveform
//! for visualizers, independent of table resolution.

use crate::wavetable::{TABLE_AMPLITUDE, TABLE_SIZE, WaveTables, WaveformShape};
use core::f32::consts::{PI, TAU};
use libm::{floorf, sinf};

/// Euclidean remainder for f32, compatible with no_std.
#[inline]
fn rem_euclid_f32(a: f32, b: f32) -> f32 {
    let r = a - b * floorf(a / b);
    if r < 0.0 { r + b } else { r }
}

/// Table-lookup oscillator.
///
/// # Example
///
/// ```rust
/// use chordsynth_synth::{Oscillator, WaveformShape};
///
/// let mut osc = Oscillator::new();
/// osc.set_shape(WaveformShape::Square);
///
/// assert_eq!(osc.sample(WaveformShape::Square, 0), 14000);
/// // Rescaled to a third of the table amplitude
/// assert_eq!(osc.sample_scaled(0, 4666), 4666);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    tables: WaveTables,
    shape: WaveformShape,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator {
    /// Create an oscillator with freshly built tables, starting on sine.
    pub fn new() -> Self {
        Self {
            tables: WaveTables::build(),
            shape: WaveformShape::Sine,
        }
    }

    /// Select the waveform read by [`sample_scaled`](Self::sample_scaled).
    #[inline]
    pub fn set_shape(&mut self, shape: WaveformShape) {
        self.shape = shape;
    }

    /// Currently selected waveform.
    #[inline]
    pub fn shape(&self) -> WaveformShape {
        self.shape
    }

    /// Advance to the next waveform and return it.
    pub fn next_shape(&mut self) -> WaveformShape {
        self.shape = self.shape.next();
        self.shape
    }

    /// Access the underlying tables.
    pub fn tables(&self) -> &WaveTables {
        &self.tables
    }

    /// Table value for `shape` at `index`.
    ///
    /// Out-of-range indices read as 0 rather than panicking.
    #[inline]
    pub fn sample(&self, shape: WaveformShape, index: usize) -> i16 {
        self.tables.get(shape, index)
    }

    /// Current-shape table value rescaled to a new peak amplitude.
    ///
    /// Tables are stored at [`TABLE_AMPLITUDE`]; the result is
    /// `stored * target / TABLE_AMPLITUDE` in integer arithmetic, so its
    /// magnitude never exceeds `|target|`.
    #[inline]
    pub fn sample_scaled(&self, index: usize, target_amplitude: i16) -> i16 {
        let stored = i32::from(self.tables.get(self.shape, index));
        (stored * i32::from(target_amplitude) / i32::from(TABLE_AMPLITUDE)) as i16
    }

    /// Number of entries per table.
    #[inline]
    pub const fn table_size() -> usize {
        TABLE_SIZE
    }

    /// Continuous waveform value for the current shape, in [-1.0, 1.0].
    pub fn current_display_value(&self, phase: f32) -> f32 {
        Self::display_value(self.shape, phase)
    }

    /// Continuous waveform value at `phase` radians, in [-1.0, 1.0].
    ///
    /// Any phase is accepted; it is wrapped into one cycle first.
    pub fn display_value(shape: WaveformShape, phase: f32) -> f32 {
        let wrapped = rem_euclid_f32(phase, TAU);
        let normalized = wrapped / TAU;

        match shape {
            WaveformShape::Sine => sinf(wrapped),
            WaveformShape::Triangle => {
                if normalized < 0.5 {
                    (4.0 * normalized) - 1.0
                } else {
                    3.0 - (4.0 * normalized)
                }
            }
            WaveformShape::Square => {
                if wrapped < PI {
                    1.0
                } else {
                    -1.0
                }
            }
            WaveformShape::Sawtooth => (2.0 * normalized) - 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_reads_requested_shape_regardless_of_selection() {
        let mut osc = Oscillator::new();
        osc.set_shape(WaveformShape::Sine);
        assert_eq!(osc.sample(WaveformShape::Square, 200), -TABLE_AMPLITUDE);
        assert_eq!(osc.sample(WaveformShape::Sawtooth, 0), -TABLE_AMPLITUDE);
    }

    #[test]
    fn sample_out_of_range_is_zero() {
        let osc = Oscillator::new();
        assert_eq!(osc.sample(WaveformShape::Square, TABLE_SIZE), 0);
        assert_eq!(osc.sample(WaveformShape::Square, TABLE_SIZE + 17), 0);
    }

    #[test]
    fn sample_scaled_uses_current_shape() {
        let mut osc = Oscillator::new();
        osc.set_shape(WaveformShape::Square);
        assert_eq!(osc.sample_scaled(0, 4666), 4666);
        assert_eq!(osc.sample_scaled(TABLE_SIZE - 1, 4666), -4666);

        osc.set_shape(WaveformShape::Sine);
        assert_eq!(osc.sample_scaled(0, 4666), 0);
    }

    #[test]
    fn sample_scaled_never_exceeds_target() {
        let mut osc = Oscillator::new();
        for shape in WaveformShape::ALL {
            osc.set_shape(shape);
            for target in [1166i16, 1555, 2333, 4666, 14000] {
                for i in 0..TABLE_SIZE {
                    let s = osc.sample_scaled(i, target);
                    assert!(
                        i32::from(s).abs() <= i32::from(target),
                        "{shape} index {i} scaled to {target} gave {s}"
                    );
                }
            }
        }
    }

    #[test]
    fn next_shape_wraps() {
        let mut osc = Oscillator::new();
        assert_eq!(osc.next_shape(), WaveformShape::Triangle);
        assert_eq!(osc.next_shape(), WaveformShape::Square);
        assert_eq!(osc.next_shape(), WaveformShape::Sawtooth);
        assert_eq!(osc.next_shape(), WaveformShape::Sine);
    }

    #[test]
    fn display_value_key_points() {
        let quarter = TAU / 4.0;
        assert!((Oscillator::display_value(WaveformShape::Sine, quarter) - 1.0).abs() < 1e-6);
        assert_eq!(Oscillator::display_value(WaveformShape::Triangle, 0.0), -1.0);
        assert!((Oscillator::display_value(WaveformShape::Triangle, PI) - 1.0).abs() < 1e-6);
        assert_eq!(Oscillator::display_value(WaveformShape::Square, 0.1), 1.0);
        assert_eq!(Oscillator::display_value(WaveformShape::Square, PI + 0.1), -1.0);
        assert_eq!(Oscillator::display_value(WaveformShape::Sawtooth, 0.0), -1.0);
    }

    #[test]
    fn display_value_wraps_phase() {
        for shape in WaveformShape::ALL {
            let a = Oscillator::display_value(shape, 1.0);
            let b = Oscillator::display_value(shape, 1.0 + 2.0 * TAU);
            let c = Oscillator::display_value(shape, 1.0 - TAU);
            assert!((a - b).abs() < 1e-4, "{shape}: {a} vs {b}");
            assert!((a - c).abs() < 1e-4, "{shape}: {a} vs {c}");
        }
    }

    #[test]
    fn display_value_in_unit_range() {
        for shape in WaveformShape::ALL {
            for i in 0..1000 {
                let v = Oscillator::display_value(shape, i as f32 * 0.037);
                assert!((-1.0..=1.0).contains(&v), "{shape}: {v}");
            }
        }
    }
}
