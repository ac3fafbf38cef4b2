//! Unison detune configuration.
//!
//! Stacks 1 to [`MAX_UNISON`] detuned copies of each note. For a base
//! detune `d` (cents) the per-voice offsets are:
//!
//! ```text
//! 1 voice   [0]
//! 2 voices  [-d, +d]
//! 3 voices  [-d, 0, +d]
//! 4 voices  [-1.5d, -0.5d, +0.5d, +1.5d]
//! ```
//!
//! Offsets become frequency ratios via [`cents_to_ratio`].

use libm::{fabsf, powf};

/// Maximum number of unison voices per note.
pub const MAX_UNISON: usize = 4;

/// Largest accepted base detune, in cents.
pub const MAX_DETUNE_CENTS: f32 = 50.0;

/// Default base detune, in cents.
pub const DEFAULT_DETUNE_CENTS: f32 = 7.0;

/// Detune changes smaller than this are treated as float noise.
const DETUNE_EPSILON: f32 = 0.001;

/// Convert a pitch offset in cents to a frequency ratio (`2^(cents/1200)`).
///
/// ```rust
/// use chordsynth_synth::cents_to_ratio;
///
/// assert_eq!(cents_to_ratio(0.0), 1.0);
/// assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-6);
/// ```
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    powf(2.0, cents / 1200.0)
}

/// Unison voice count and detune, with the derived ratio table.
///
/// Setters return whether the ratio table was regenerated, so callers only
/// recompute dependent phase increments when something actually changed.
///
/// ## Invariants
///
/// - `ratios().len() == voice_count()`
/// - ratios are symmetric around 1.0 and ascending
/// - with an odd voice count, the middle ratio is exactly 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct UnisonConfig {
    voice_count: usize,
    base_detune_cents: f32,
    ratios: [f32; MAX_UNISON],
}

impl Default for UnisonConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl UnisonConfig {
    /// Single voice, default detune of 7 cents.
    pub fn new() -> Self {
        let mut config = Self {
            voice_count: 1,
            base_detune_cents: DEFAULT_DETUNE_CENTS,
            ratios: [1.0; MAX_UNISON],
        };
        config.recalculate_ratios();
        config
    }

    /// Set the voice count, clamped to `1..=MAX_UNISON`.
    ///
    /// Returns `true` if the count changed and ratios were regenerated.
    pub fn set_voice_count(&mut self, count: usize) -> bool {
        let count = count.clamp(1, MAX_UNISON);
        if count == self.voice_count {
            return false;
        }
        self.voice_count = count;
        self.recalculate_ratios();
        true
    }

    /// Number of active unison voices.
    #[inline]
    pub fn voice_count(&self) -> usize {
        self.voice_count
    }

    /// Set the base detune in cents, clamped to `0.0..=50.0`. NaN is ignored.
    ///
    /// Returns `true` if the value moved by more than float noise and
    /// ratios were regenerated.
    pub fn set_base_detune_cents(&mut self, cents: f32) -> bool {
        if cents.is_nan() {
            return false;
        }
        let cents = cents.clamp(0.0, MAX_DETUNE_CENTS);
        if fabsf(cents - self.base_detune_cents) < DETUNE_EPSILON {
            return false;
        }
        self.base_detune_cents = cents;
        self.recalculate_ratios();
        true
    }

    /// Base detune in cents.
    #[inline]
    pub fn base_detune_cents(&self) -> f32 {
        self.base_detune_cents
    }

    /// Frequency ratios for the active voices.
    #[inline]
    pub fn ratios(&self) -> &[f32] {
        &self.ratios[..self.voice_count]
    }

    fn recalculate_ratios(&mut self) {
        let d = self.base_detune_cents;
        let offsets: &[f32] = match self.voice_count {
            1 => &[0.0],
            2 => &[-d, d],
            3 => &[-d, 0.0, d],
            _ => &[-1.5 * d, -0.5 * d, 0.5 * d, 1.5 * d],
        };

        self.ratios = [1.0; MAX_UNISON];
        for (ratio, &cents) in self.ratios.iter_mut().zip(offsets) {
            *ratio = if cents == 0.0 {
                1.0
            } else {
                cents_to_ratio(cents)
            };
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            voices = self.voice_count,
            detune_cents = self.base_detune_cents,
            "unison ratios recalculated"
        );
    }
}
