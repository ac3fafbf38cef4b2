//! Synthesizer configuration file format.

use crate::error::ConfigError;
use crate::paths;
use chordsynth_synth::chord::highest_note;
use chordsynth_synth::unison::{MAX_DETUNE_CENTS, MAX_UNISON};
use chordsynth_synth::{PhaseAccumulator, TABLE_SIZE, cents_to_ratio};
use chordsynth_synth::{Chord, PlayMode, Progression, WaveformShape, find_chord, find_progression};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete configuration.
///
/// Every field has a default, so an empty file (or no file) is valid.
///
/// # TOML Format
///
/// ```toml
/// [audio]
/// sample_rate = 44100
/// buffer_frames = 256
/// queue_depth = 4
/// device = "USB Audio"
///
/// [synth]
/// waveform = "saw"
/// unison = 2
/// detune_cents = 7.0
/// tone_hz = 440.0
/// chord = "Ebmaj7"
/// progression = "jazz"
/// progression_interval_ms = 1600
/// mode = "chord"
///
/// [control]
/// render_lock_timeout_us = 500
/// control_lock_timeout_ms = 10
/// frame_rate = 10
/// volume = 0.75
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthConfig {
    /// Output stream settings.
    pub audio: AudioConfig,
    /// Sound settings applied at startup.
    pub synth: SoundConfig,
    /// Control thread and locking settings.
    pub control: ControlConfig,
}

/// Output stream settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Stereo frames per rendered buffer.
    pub buffer_frames: usize,
    /// Buffers queued between the render loop and the device.
    pub queue_depth: usize,
    /// Output device name; the host default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            buffer_frames: 256,
            queue_depth: 4,
            device: None,
        }
    }
}

/// Sound settings applied at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SoundConfig {
    /// Waveform name (`sine`, `triangle`, `square`, `sawtooth` or a short name).
    pub waveform: String,
    /// Unison voices per chord note.
    pub unison: usize,
    /// Unison base detune in cents.
    pub detune_cents: f32,
    /// Single-note mode frequency in Hz.
    pub tone_hz: f32,
    /// Chord played in Chord mode.
    pub chord: String,
    /// Progression played in Progression mode.
    pub progression: String,
    /// Time between progression steps.
    pub progression_interval_ms: u64,
    /// Initial play mode (`single`, `chord` or `progression`).
    pub mode: String,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            waveform: "sine".to_string(),
            unison: 1,
            detune_cents: 7.0,
            tone_hz: 440.0,
            chord: "Cm7".to_string(),
            progression: "jazz".to_string(),
            progression_interval_ms: 1600,
            mode: "single".to_string(),
        }
    }
}

/// Control thread and locking settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlConfig {
    /// Longest the render thread waits for the control lock.
    pub render_lock_timeout_us: u64,
    /// Longest the control thread waits for the control lock.
    pub control_lock_timeout_ms: u64,
    /// Status display refresh rate.
    pub frame_rate: u32,
    /// Initial volume knob position in `0.0..=1.0`.
    pub volume: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            render_lock_timeout_us: 500,
            control_lock_timeout_ms: 10,
            frame_rate: 10,
            volume: 0.75,
        }
    }
}

impl SynthConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: SynthConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the default config file when it exists,
    /// else the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = paths::default_config_path();
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let audio = &self.audio;
        if audio.sample_rate == 0 {
            return Err(ConfigError::invalid(
                "audio.sample_rate",
                "must be greater than 0",
            ));
        }
        if audio.buffer_frames == 0 {
            return Err(ConfigError::invalid(
                "audio.buffer_frames",
                "must be greater than 0",
            ));
        }
        if audio.queue_depth == 0 {
            return Err(ConfigError::invalid(
                "audio.queue_depth",
                "must be at least 1",
            ));
        }

        let synth = &self.synth;
        self.waveform()?;
        self.chord()?;
        self.progression()?;
        self.mode()?;
        if !(1..=MAX_UNISON).contains(&synth.unison) {
            return Err(ConfigError::invalid(
                "synth.unison",
                format!("{} is outside 1..={MAX_UNISON}", synth.unison),
            ));
        }
        if !(0.0..=MAX_DETUNE_CENTS).contains(&synth.detune_cents) {
            return Err(ConfigError::invalid(
                "synth.detune_cents",
                format!("{} is outside 0..={MAX_DETUNE_CENTS}", synth.detune_cents),
            ));
        }
        // A phase increment of a whole table or more cannot be wrapped by a
        // single subtraction.
        let fastest = highest_note() * cents_to_ratio(1.5 * MAX_DETUNE_CENTS);
        let sample_rate = audio.sample_rate as f32;
        if PhaseAccumulator::increment_for(fastest, sample_rate) >= TABLE_SIZE as f32 {
            return Err(ConfigError::invalid(
                "audio.sample_rate",
                format!("must be above {fastest:.1} Hz, the fastest unison voice"),
            ));
        }

        let nyquist = sample_rate / 2.0;
        if !(synth.tone_hz > 0.0 && synth.tone_hz < nyquist) {
            return Err(ConfigError::invalid(
                "synth.tone_hz",
                format!("{} must be between 0 and {nyquist} Hz", synth.tone_hz),
            ));
        }
        if synth.progression_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "synth.progression_interval_ms",
                "must be greater than 0",
            ));
        }

        let control = &self.control;
        if control.frame_rate == 0 {
            return Err(ConfigError::invalid(
                "control.frame_rate",
                "must be greater than 0",
            ));
        }
        if !(0.0..=1.0).contains(&control.volume) {
            return Err(ConfigError::invalid(
                "control.volume",
                format!("{} is outside 0.0..=1.0", control.volume),
            ));
        }
        Ok(())
    }

    /// Startup waveform.
    pub fn waveform(&self) -> Result<WaveformShape, ConfigError> {
        self.synth
            .waveform
            .parse()
            .map_err(|_| ConfigError::UnknownWaveform(self.synth.waveform.clone()))
    }

    /// Chord for Chord mode.
    pub fn chord(&self) -> Result<&'static Chord, ConfigError> {
        find_chord(&self.synth.chord).ok_or_else(|| ConfigError::UnknownChord(self.synth.chord.clone()))
    }

    /// Progression for Progression mode.
    pub fn progression(&self) -> Result<&'static Progression, ConfigError> {
        find_progression(&self.synth.progression)
            .ok_or_else(|| ConfigError::UnknownProgression(self.synth.progression.clone()))
    }

    /// Startup play mode.
    pub fn mode(&self) -> Result<PlayMode, ConfigError> {
        self.synth
            .mode
            .parse()
            .map_err(|_| ConfigError::UnknownMode(self.synth.mode.clone()))
    }

    /// Time between progression steps.
    pub fn progression_interval(&self) -> Duration {
        Duration::from_millis(self.synth.progression_interval_ms)
    }

    /// Render thread lock deadline.
    pub fn render_lock_timeout(&self) -> Duration {
        Duration::from_micros(self.control.render_lock_timeout_us)
    }

    /// Control thread lock deadline.
    pub fn control_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.control.control_lock_timeout_ms)
    }

    /// Status display refresh period.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.control.frame_rate.max(1)
    }

    /// Duration of one rendered buffer at the configured rate.
    pub fn buffer_duration(&self) -> Duration {
        Duration::from_secs_f64(self.audio.buffer_frames as f64 / f64::from(self.audio.sample_rate.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SynthConfig::default();
        config.validate().unwrap();
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.audio.buffer_frames, 256);
        assert_eq!(config.waveform().unwrap(), WaveformShape::Sine);
        assert_eq!(config.chord().unwrap().name, "Cm7");
        assert_eq!(config.progression().unwrap().name, "jazz");
        assert_eq!(config.mode().unwrap(), PlayMode::SingleNote);
        assert_eq!(config.progression_interval(), Duration::from_millis(1600));
        assert_eq!(config.render_lock_timeout(), Duration::from_micros(500));
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(SynthConfig::from_toml("").unwrap(), SynthConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SynthConfig::from_toml(
            r#"
            [synth]
            waveform = "SAW"
            unison = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.waveform().unwrap(), WaveformShape::Sawtooth);
        assert_eq!(config.synth.unison, 3);
        assert_eq!(config.synth.detune_cents, 7.0);
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let err = SynthConfig::from_toml("[audio]\nsample_rate = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "audio.sample_rate",
                ..
            }
        ));
    }

    #[test]
    fn rejects_sample_rate_below_highest_voice() {
        // G6 detuned by 75 cents is about 1636 Hz.
        let err = SynthConfig::from_toml("[audio]\nsample_rate = 1000\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "audio.sample_rate",
                ..
            }
        ));
        assert!(SynthConfig::from_toml("[audio]\nsample_rate = 1636\n").is_err());

        let config = SynthConfig::from_toml(
            "[audio]\nsample_rate = 8000\n[synth]\ntone_hz = 440.0\n",
        )
        .unwrap();
        assert_eq!(config.audio.sample_rate, 8000);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = SynthConfig::from_toml("[synth]\nchord = \"Bbsus4\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownChord(ref n) if n == "Bbsus4"));

        let err = SynthConfig::from_toml("[synth]\nprogression = \"blues\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProgression(_)));

        let err = SynthConfig::from_toml("[synth]\nwaveform = \"noise\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownWaveform(_)));

        let err = SynthConfig::from_toml("[synth]\nmode = \"arp\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMode(_)));
    }

    #[test]
    fn rejects_out_of_range_values() {
        for (doc, field) in [
            ("[synth]\nunison = 5\n", "synth.unison"),
            ("[synth]\ndetune_cents = 51.0\n", "synth.detune_cents"),
            ("[synth]\ntone_hz = 30000.0\n", "synth.tone_hz"),
            ("[synth]\nprogression_interval_ms = 0\n", "synth.progression_interval_ms"),
            ("[audio]\nbuffer_frames = 0\n", "audio.buffer_frames"),
            ("[control]\nvolume = 1.5\n", "control.volume"),
            ("[control]\nframe_rate = 0\n", "control.frame_rate"),
        ] {
            match SynthConfig::from_toml(doc) {
                Err(ConfigError::Invalid { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{field}: expected Invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SynthConfig::from_toml("[audio\nsample_rate = 1").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let mut config = SynthConfig::default();
        config.audio.device = Some("USB Audio".to_string());
        config.synth.mode = "progression".to_string();
        let text = config.to_toml().unwrap();
        assert_eq!(SynthConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn buffer_duration_matches_frames() {
        let config = SynthConfig::default();
        let micros = config.buffer_duration().as_micros();
        // 256 / 44100 s = 5804.98 us
        assert!((5804..=5805).contains(&micros), "got {micros}");
    }
}
