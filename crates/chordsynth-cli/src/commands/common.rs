//! Shared CLI helpers used across multiple commands.

use chordsynth_config::SynthConfig;
use chordsynth_io::RenderConfig;
use chordsynth_platform::{ControlEvent, ControlState};
use clap::Args;
use std::path::Path;
use std::time::Duration;

/// Sound settings that override the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub struct SoundArgs {
    /// Waveform: sine, square, sawtooth or triangle
    #[arg(short, long)]
    pub waveform: Option<String>,

    /// Play mode: single, chord or progression
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Chord name (e.g. "Cm7")
    #[arg(long)]
    pub chord: Option<String>,

    /// Progression name (e.g. "jazz")
    #[arg(long)]
    pub progression: Option<String>,

    /// Unison voices per note (1-4)
    #[arg(short, long)]
    pub unison: Option<usize>,

    /// Unison base detune in cents (0-50)
    #[arg(long)]
    pub detune: Option<f32>,

    /// Single-note frequency in Hz
    #[arg(long)]
    pub tone: Option<f32>,

    /// Milliseconds between progression steps
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Volume (0-1)
    #[arg(long)]
    pub volume: Option<f32>,

    /// Sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Stereo frames per buffer
    #[arg(long)]
    pub buffer_frames: Option<usize>,
}

impl SoundArgs {
    /// Write every given flag into `config`.
    pub fn apply(&self, config: &mut SynthConfig) {
        let synth = &mut config.synth;
        if let Some(v) = &self.waveform {
            synth.waveform.clone_from(v);
        }
        if let Some(v) = &self.mode {
            synth.mode.clone_from(v);
        }
        if let Some(v) = &self.chord {
            synth.chord.clone_from(v);
        }
        if let Some(v) = &self.progression {
            synth.progression.clone_from(v);
        }
        if let Some(v) = self.unison {
            synth.unison = v;
        }
        if let Some(v) = self.detune {
            synth.detune_cents = v;
        }
        if let Some(v) = self.tone {
            synth.tone_hz = v;
        }
        if let Some(v) = self.interval_ms {
            synth.progression_interval_ms = v;
        }
        if let Some(v) = self.volume {
            config.control.volume = v;
        }
        if let Some(v) = self.sample_rate {
            config.audio.sample_rate = v;
        }
        if let Some(v) = self.buffer_frames {
            config.audio.buffer_frames = v;
        }
    }
}

/// Load the configuration, apply flag overrides and validate the result.
pub fn load_config(path: Option<&Path>, overrides: &SoundArgs) -> anyhow::Result<SynthConfig> {
    let mut config = SynthConfig::load_or_default(path)?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Control state matching the configured sound, as of `now`.
pub fn initial_state(config: &SynthConfig, now: Duration) -> anyhow::Result<ControlState> {
    let mut state = ControlState::new(config.chord()?, config.progression()?);
    state.apply(ControlEvent::SetWaveform(config.waveform()?), now);
    state.apply(ControlEvent::SetUnisonCount(config.synth.unison), now);
    state.apply(ControlEvent::SetDetuneCents(config.synth.detune_cents), now);
    state.apply(ControlEvent::SetMode(config.mode()?), now);
    Ok(state)
}

/// Render loop settings from the configuration.
pub fn render_config(config: &SynthConfig) -> RenderConfig {
    RenderConfig {
        sample_rate: config.audio.sample_rate,
        buffer_frames: config.audio.buffer_frames,
        tone_hz: config.synth.tone_hz,
        progression_interval: config.progression_interval(),
        lock_timeout: config.render_lock_timeout(),
    }
}
