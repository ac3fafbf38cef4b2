//! Real-time render loop.
//!
//! [`RenderLoop`] owns the [`Synth`] and every voice phase. Each iteration
//! reads and smooths the amplitude knob, steps the progression when due,
//! snapshots the shared control state, renders one fixed-size stereo buffer
//! and blocks on the sink until it is accepted. Shared state is only ever
//! touched through deadline-bounded locks; on timeout the loop keeps the
//! last snapshot it managed to read.

use crate::Result;
use crate::sink::AudioSink;
use chordsynth_platform::{
    AmplitudeSmoother, AmplitudeSource, Clock, ControlSnapshot, SharedControl,
};
use chordsynth_synth::{DEFAULT_TONE_HZ, PlayMode, Synth};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Render loop settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Stereo frames per buffer.
    pub buffer_frames: usize,
    /// Single-note mode frequency in Hz.
    pub tone_hz: f32,
    /// Time between progression steps.
    pub progression_interval: Duration,
    /// Longest the loop waits for the control lock.
    pub lock_timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            buffer_frames: 256,
            tone_hz: DEFAULT_TONE_HZ,
            progression_interval: Duration::from_millis(1600),
            lock_timeout: Duration::from_micros(500),
        }
    }
}

impl RenderConfig {
    /// Playback time covered by one buffer.
    pub fn buffer_duration(&self) -> Duration {
        Duration::from_secs_f64(self.buffer_frames as f64 / f64::from(self.sample_rate.max(1)))
    }
}

/// Counters kept by the render loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Buffers handed to the sink.
    pub buffers: u64,
    /// Iterations that reused the previous snapshot because the lock was busy.
    pub snapshot_fallbacks: u64,
    /// Smoothed amplitudes that could not be stored because the lock was busy.
    pub amplitude_misses: u64,
    /// Progression steps taken.
    pub progression_steps: u64,
    /// Play mode changes applied.
    pub mode_changes: u64,
}

/// Fixed-cadence buffer producer.
///
/// Generic over the amplitude input and the clock so tests and offline
/// rendering can drive it deterministically.
pub struct RenderLoop<A, C> {
    synth: Synth,
    control: SharedControl,
    amplitude: A,
    clock: C,
    smoother: AmplitudeSmoother,
    snapshot: ControlSnapshot,
    mode: PlayMode,
    buffer: Vec<i16>,
    config: RenderConfig,
    stats: RenderStats,
}

impl<A: AmplitudeSource, C: Clock> RenderLoop<A, C> {
    /// Build the synth and preallocate the output buffer.
    pub fn new(config: RenderConfig, control: SharedControl, amplitude: A, clock: C) -> Self {
        let synth = Synth::new(config.sample_rate as f32, config.tone_hz);
        let smoother = AmplitudeSmoother::settled(amplitude.read_raw());
        Self {
            synth,
            control,
            amplitude,
            clock,
            smoother,
            snapshot: ControlSnapshot::default(),
            mode: PlayMode::SingleNote,
            buffer: vec![0; config.buffer_frames * 2],
            config,
            stats: RenderStats::default(),
        }
    }

    /// Render one buffer and hand it to `sink`.
    ///
    /// Returns the number of bytes the sink accepted.
    pub fn render_iteration<S: AudioSink + ?Sized>(&mut self, sink: &mut S) -> Result<usize> {
        let timeout = self.config.lock_timeout;

        let amplitude = self.smoother.update(self.amplitude.read_raw());
        if !self.control.store_amplitude(amplitude, timeout) {
            self.stats.amplitude_misses += 1;
        }

        let now = self.clock.now();
        if let Some(index) =
            self.control
                .advance_progression(now, self.config.progression_interval, timeout)
        {
            self.follow_progression(index);
        }

        match self.control.snapshot(timeout) {
            Some(snapshot) => self.snapshot = snapshot,
            None => self.stats.snapshot_fallbacks += 1,
        }

        self.apply_snapshot();
        self.synth
            .render_block(self.mode, self.snapshot.amplitude.value, &mut self.buffer);

        let accepted = sink.write(&self.buffer)?;
        self.stats.buffers += 1;
        Ok(accepted)
    }

    /// Record a progression step in the held snapshot so the new chord
    /// plays even if this iteration's snapshot read times out.
    fn follow_progression(&mut self, index: usize) {
        if let Some(chord) = self.snapshot.progression.get(index) {
            self.snapshot.chord = chord;
            self.snapshot.progression_index = index;
        }
        self.stats.progression_steps += 1;
    }

    fn apply_snapshot(&mut self) {
        let snap = self.snapshot;
        if snap.mode != self.mode {
            self.synth.reset();
            if snap.mode == PlayMode::Progression {
                self.synth
                    .mixer_mut()
                    .set_chord_from_progression(snap.progression_index, snap.progression.chords);
            }
            tracing::debug!(from = %self.mode, to = %snap.mode, "play mode changed");
            self.mode = snap.mode;
            self.stats.mode_changes += 1;
        }

        self.synth.set_shape(snap.waveform);
        let mixer = self.synth.mixer_mut();
        mixer.set_unison_count(snap.unison_count);
        mixer.set_detune_cents(snap.detune_cents);
        self.synth.set_chord(snap.chord);
    }

    /// Render until `running` is cleared, yielding between buffers.
    ///
    /// Returns the first sink error, if any. Underruns reported by the sink
    /// are logged about once per second of audio.
    pub fn run<S: AudioSink + ?Sized>(
        &mut self,
        sink: &mut S,
        running: &AtomicBool,
    ) -> Result<RenderStats> {
        let buffers_per_second = self.config.sample_rate as usize / self.config.buffer_frames.max(1);
        let report_every = buffers_per_second.max(1) as u64;
        let mut reported_underruns = sink.underruns();

        tracing::info!(
            sample_rate = self.config.sample_rate,
            buffer_frames = self.config.buffer_frames,
            "render loop started"
        );

        while running.load(Ordering::Acquire) {
            self.render_iteration(sink)?;

            if self.stats.buffers % report_every == 0 {
                let underruns = sink.underruns();
                if underruns > reported_underruns {
                    tracing::warn!(
                        new = underruns - reported_underruns,
                        total = underruns,
                        "output underruns"
                    );
                    reported_underruns = underruns;
                }
            }

            std::thread::yield_now();
        }

        sink.flush()?;
        tracing::info!(
            buffers = self.stats.buffers,
            fallbacks = self.stats.snapshot_fallbacks,
            "render loop stopped"
        );
        Ok(self.stats)
    }

    /// Synth state, for inspection.
    pub fn synth(&self) -> &Synth {
        &self.synth
    }

    /// Play mode applied to the last buffer.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Snapshot used for the last buffer.
    pub fn last_snapshot(&self) -> &ControlSnapshot {
        &self.snapshot
    }

    /// Counters so far.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Shared control handle.
    pub fn control(&self) -> &SharedControl {
        &self.control
    }

    /// Settings.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}
