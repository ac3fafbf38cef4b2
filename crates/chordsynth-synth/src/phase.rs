//! Table-domain phase accumulator.
//!
//! Phase runs over `[0, TABLE_SIZE)` instead of `[0, 1)` so the integer part
//! is directly a table index. The increment for frequency `f` at sample
//! rate `sr` is `TABLE_SIZE * f / sr`.

use crate::wavetable::TABLE_SIZE;

const TABLE_LEN: f32 = TABLE_SIZE as f32;

/// Per-voice phase state.
///
/// ## Invariants
///
/// - After [`wrap`](Self::wrap), `phase` is in `[0, TABLE_SIZE)` as long as
///   the increment is below `TABLE_SIZE` (any frequency under the sample rate).
/// - Wrapping subtracts the table length instead of taking a modulo.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseAccumulator {
    phase: f32,
    increment: f32,
}

impl PhaseAccumulator {
    /// Create an accumulator at phase 0 with no increment.
    pub const fn new() -> Self {
        Self {
            phase: 0.0,
            increment: 0.0,
        }
    }

    /// Phase increment for `frequency` Hz at `sample_rate` Hz.
    #[inline]
    pub fn increment_for(frequency: f32, sample_rate: f32) -> f32 {
        (TABLE_LEN * frequency) / sample_rate
    }

    /// Set the per-sample increment directly.
    #[inline]
    pub fn set_increment(&mut self, increment: f32) {
        self.increment = increment;
    }

    /// Set the increment from a frequency. Phase is preserved.
    #[inline]
    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        self.increment = Self::increment_for(frequency, sample_rate);
    }

    /// Current per-sample increment.
    #[inline]
    pub fn increment(&self) -> f32 {
        self.increment
    }

    /// Current phase in table units.
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Bring phase back into `[0, TABLE_SIZE)`.
    #[inline]
    pub fn wrap(&mut self) {
        if self.phase >= TABLE_LEN {
            self.phase -= TABLE_LEN;
        }
    }

    /// Table index for the current phase (truncated).
    #[inline]
    pub fn index(&self) -> usize {
        self.phase as usize
    }

    /// Move forward by one sample.
    #[inline]
    pub fn advance(&mut self) {
        self.phase += self.increment;
    }

    /// Wrap, read the index, then advance: one sample of playback.
    #[inline]
    pub fn tick(&mut self) -> usize {
        self.wrap();
        let index = self.index();
        self.advance();
        index
    }

    /// Return the phase to 0, keeping the increment.
    #[inline]
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
