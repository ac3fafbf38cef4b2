//! Single-cycle waveform lookup tables.
//!
//! Four tables (sine, triangle, square, sawtooth) of [`TABLE_SIZE`] signed
//! 16-bit samples are computed once from closed-form math. Selecting a
//! waveform only changes which table is read; the tables themselves never
//! change after [`WaveTables::build`].
//!
//! All tables peak at [`TABLE_AMPLITUDE`], which sits well below
//! `i16::MAX` so a single voice never clips on its own.

use core::f32::consts::TAU;
use core::fmt;
use core::str::FromStr;
use libm::sinf;

/// Number of samples in one waveform cycle.
pub const TABLE_SIZE: usize = 256;

/// Peak amplitude stored in every table.
pub const TABLE_AMPLITUDE: i16 = 14000;

/// Waveform shapes available to the oscillator.
///
/// The set is closed: dispatch is a plain `match`, no trait objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WaveformShape {
    /// Sine waveform, pure fundamental.
    #[default]
    Sine,
    /// Triangle waveform, piecewise-linear rise and fall.
    Triangle,
    /// Square waveform, 50% duty cycle.
    Square,
    /// Sawtooth waveform, linear ramp from negative to positive peak.
    Sawtooth,
}

impl WaveformShape {
    /// All shapes in cycling order.
    pub const ALL: [WaveformShape; 4] = [
        WaveformShape::Sine,
        WaveformShape::Triangle,
        WaveformShape::Square,
        WaveformShape::Sawtooth,
    ];

    /// Table slot for this shape.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            WaveformShape::Sine => 0,
            WaveformShape::Triangle => 1,
            WaveformShape::Square => 2,
            WaveformShape::Sawtooth => 3,
        }
    }

    /// Shape for a table slot, wrapping out-of-range slots.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Next shape in cycling order (wraps from Sawtooth back to Sine).
    #[inline]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Short display name, as shown on the device screen.
    pub const fn short_name(self) -> &'static str {
        match self {
            WaveformShape::Sine => "SINE",
            WaveformShape::Triangle => "TRI",
            WaveformShape::Square => "SQR",
            WaveformShape::Sawtooth => "SAW",
        }
    }

    /// Lowercase full name.
    pub const fn name(self) -> &'static str {
        match self {
            WaveformShape::Sine => "sine",
            WaveformShape::Triangle => "triangle",
            WaveformShape::Square => "square",
            WaveformShape::Sawtooth => "sawtooth",
        }
    }
}

impl fmt::Display for WaveformShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a waveform name is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownWaveform;

impl fmt::Display for UnknownWaveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown waveform (expected sine, triangle, square or sawtooth)")
    }
}

impl FromStr for WaveformShape {
    type Err = UnknownWaveform;

    /// Parses full or short names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaveformShape::ALL
            .into_iter()
            .find(|shape| {
                s.eq_ignore_ascii_case(shape.name()) || s.eq_ignore_ascii_case(shape.short_name())
            })
            .ok_or(UnknownWaveform)
    }
}

/// The four precomputed waveform tables.
#[derive(Clone)]
pub struct WaveTables {
    tables: [[i16; TABLE_SIZE]; 4],
}

impl fmt::Debug for WaveTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaveTables")
            .field("size", &TABLE_SIZE)
            .field("amplitude", &TABLE_AMPLITUDE)
            .finish()
    }
}

impl Default for WaveTables {
    fn default() -> Self {
        Self::build()
    }
}

impl WaveTables {
    /// Compute all tables. Deterministic; call once at startup.
    ///
    /// Per-shape formulas for sample index `i` of `N`:
    ///
    /// ```text
    /// sine      A * sin(2π i / N)
    /// triangle  A * (4i/N - 1)     for i < N/2
    ///           A * (3 - 4i/N)     otherwise
    /// square    +A for i < N/2, -A otherwise
    /// sawtooth  A * (2i/N - 1)
    /// ```
    ///
    /// Float results are truncated toward zero.
    pub fn build() -> Self {
        let mut tables = [[0i16; TABLE_SIZE]; 4];
        let amp = f32::from(TABLE_AMPLITUDE);
        let n = TABLE_SIZE as f32;

        for i in 0..TABLE_SIZE {
            let x = i as f32;
            let phase = (TAU * x) / n;

            tables[WaveformShape::Sine.index()][i] = (sinf(phase) * amp) as i16;

            let triangle = if i < TABLE_SIZE / 2 {
                (4.0 * x / n) - 1.0
            } else {
                3.0 - (4.0 * x / n)
            };
            tables[WaveformShape::Triangle.index()][i] = (triangle * amp) as i16;

            tables[WaveformShape::Square.index()][i] = if i < TABLE_SIZE / 2 {
                TABLE_AMPLITUDE
            } else {
                -TABLE_AMPLITUDE
            };

            let saw = (2.0 * x / n) - 1.0;
            tables[WaveformShape::Sawtooth.index()][i] = (saw * amp) as i16;
        }

        Self { tables }
    }

    /// Raw table for a shape.
    #[inline]
    pub fn table(&self, shape: WaveformShape) -> &[i16; TABLE_SIZE] {
        &self.tables[shape.index()]
    }

    /// Table value at `index`, or 0 when the index is out of range.
    #[inline]
    pub fn get(&self, shape: WaveformShape, index: usize) -> i16 {
        self.tables[shape.index()].get(index).copied().unwrap_or(0)
    }
}
