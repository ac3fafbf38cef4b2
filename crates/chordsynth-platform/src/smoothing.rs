//! Amplitude knob smoothing.
//!
//! Raw 12-bit readings are filtered by a single-pole IIR with a 7/8 retain
//! factor, normalized, and snapped to silence below a small floor so a knob
//! resting near zero does not leak noise.
//!
//! A full-scale step from 0 reaches 99% of its target after
//! `ceil(ln(0.01) / ln(7/8)) = 35` updates.

/// Largest raw reading (12-bit converter).
pub const RAW_MAX: u16 = 4095;

/// Fraction of the previous smoothed value kept per update.
pub const RETAIN: f32 = 7.0 / 8.0;

/// Normalized amplitudes below this are forced to exactly 0.0.
pub const MUTE_THRESHOLD: f32 = 0.05;

/// A smoothed, normalized amplitude and its display percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Amplitude {
    /// Normalized amplitude in `0.0..=1.0`.
    pub value: f32,
    /// `round(value * 100)`, 0 when muted.
    pub percent: u8,
}

impl Amplitude {
    /// Silence.
    pub const SILENT: Amplitude = Amplitude {
        value: 0.0,
        percent: 0,
    };

    /// Full scale.
    pub const FULL: Amplitude = Amplitude {
        value: 1.0,
        percent: 100,
    };

    /// Build from a normalized value, applying the mute floor.
    pub fn from_normalized(value: f32) -> Self {
        let value = value.clamp(0.0, 1.0);
        if value < MUTE_THRESHOLD {
            return Self::SILENT;
        }
        Self {
            value,
            percent: (value * 100.0).round() as u8,
        }
    }
}

/// Single-pole smoothing filter over raw knob readings.
///
/// # Example
///
/// ```rust
/// use chordsynth_platform::smoothing::{AmplitudeSmoother, RAW_MAX};
///
/// let mut smoother = AmplitudeSmoother::new();
/// let mut last = 0.0;
/// for _ in 0..35 {
///     let amp = smoother.update(RAW_MAX);
///     assert!(amp.value >= last);
///     last = amp.value;
/// }
/// assert!(last > 0.99);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmplitudeSmoother {
    smoothed: f32,
}

impl AmplitudeSmoother {
    /// Create a smoother resting at 0.
    pub const fn new() -> Self {
        Self { smoothed: 0.0 }
    }

    /// Create a smoother already settled on `raw`.
    pub fn settled(raw: u16) -> Self {
        Self {
            smoothed: f32::from(raw.min(RAW_MAX)),
        }
    }

    /// Feed one raw reading and return the resulting amplitude.
    ///
    /// Readings above [`RAW_MAX`] are clamped.
    pub fn update(&mut self, raw: u16) -> Amplitude {
        let raw = f32::from(raw.min(RAW_MAX));
        self.smoothed = self.smoothed * RETAIN + raw * (1.0 - RETAIN);
        self.amplitude()
    }

    /// Smoothed raw value in `0.0..=4095.0`.
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Current amplitude without feeding a new reading.
    pub fn amplitude(&self) -> Amplitude {
        Amplitude::from_normalized(self.smoothed / f32::from(RAW_MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_reaches_99_percent_in_35_updates() {
        let mut s = AmplitudeSmoother::new();
        for _ in 0..34 {
            s.update(RAW_MAX);
        }
        assert!(s.amplitude().value < 0.99);
        let amp = s.update(RAW_MAX);
        assert!(amp.value > 0.99, "got {}", amp.value);
        assert_eq!(amp.percent, 99);
    }

    #[test]
    fn step_is_monotonic() {
        let mut s = AmplitudeSmoother::new();
        let mut prev = s.smoothed();
        for _ in 0..60 {
            s.update(RAW_MAX);
            assert!(s.smoothed() >= prev);
            assert!(s.smoothed() <= f32::from(RAW_MAX));
            prev = s.smoothed();
        }
    }

    #[test]
    fn below_floor_is_exact_silence() {
        // 0.04 * 4095 = 163.8
        let s = AmplitudeSmoother::settled(163);
        assert_eq!(s.amplitude(), Amplitude::SILENT);
        assert_eq!(s.amplitude().value, 0.0);

        let s = AmplitudeSmoother::settled(300);
        assert!(s.amplitude().value > MUTE_THRESHOLD);
        assert_eq!(s.amplitude().percent, 7);
    }

    #[test]
    fn raw_readings_are_clamped() {
        let s = AmplitudeSmoother::settled(u16::MAX);
        assert_eq!(s.amplitude(), Amplitude::FULL);
    }

    #[test]
    fn from_normalized_rounds_percent() {
        assert_eq!(Amplitude::from_normalized(0.756).percent, 76);
        assert_eq!(Amplitude::from_normalized(1.5), Amplitude::FULL);
        assert_eq!(Amplitude::from_normalized(-1.0), Amplitude::SILENT);
    }
}
