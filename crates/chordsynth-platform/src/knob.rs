//! Raw amplitude inputs.

use crate::smoothing::RAW_MAX;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

/// Source of raw 12-bit amplitude readings.
///
/// The render loop reads this once per buffer. Implementations must not
/// block.
pub trait AmplitudeSource: Send {
    /// Current raw reading in `0..=4095`.
    fn read_raw(&self) -> u16;
}

/// Lock-free knob written by the control thread, read by the render thread.
///
/// Clones share the same value.
#[derive(Debug, Clone)]
pub struct Knob {
    raw: Arc<AtomicU16>,
}

impl Knob {
    /// Create a knob at raw position `raw` (clamped to 4095).
    pub fn new(raw: u16) -> Self {
        Self {
            raw: Arc::new(AtomicU16::new(raw.min(RAW_MAX))),
        }
    }

    /// Create a knob at a normalized position.
    pub fn from_normalized(value: f32) -> Self {
        Self::new(normalized_to_raw(value))
    }

    /// Set the raw position (clamped to 4095).
    #[inline]
    pub fn set_raw(&self, raw: u16) {
        self.raw.store(raw.min(RAW_MAX), Ordering::Release);
    }

    /// Set the position from `0.0..=1.0`.
    pub fn set_normalized(&self, value: f32) {
        self.set_raw(normalized_to_raw(value));
    }

    /// Current raw position.
    #[inline]
    pub fn raw(&self) -> u16 {
        self.raw.load(Ordering::Acquire)
    }
}

impl Default for Knob {
    fn default() -> Self {
        Self::new(RAW_MAX)
    }
}

impl AmplitudeSource for Knob {
    fn read_raw(&self) -> u16 {
        self.raw()
    }
}

fn normalized_to_raw(value: f32) -> u16 {
    (value.clamp(0.0, 1.0) * f32::from(RAW_MAX)).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_position() {
        let knob = Knob::new(0);
        let other = knob.clone();
        other.set_raw(2048);
        assert_eq!(knob.read_raw(), 2048);
    }

    #[test]
    fn positions_are_clamped() {
        let knob = Knob::new(u16::MAX);
        assert_eq!(knob.raw(), RAW_MAX);
        knob.set_normalized(2.0);
        assert_eq!(knob.raw(), RAW_MAX);
        knob.set_normalized(-0.5);
        assert_eq!(knob.raw(), 0);
        knob.set_normalized(0.5);
        assert_eq!(knob.raw(), 2048);
    }
}
