//! Offline rendering command.
//!
//! Runs the same render loop as `play`, driven by a simulated clock that
//! advances one buffer per iteration, so the output is deterministic.

use super::common::{SoundArgs, initial_state, load_config, render_config};
use chordsynth_io::{RenderLoop, WavSink};
use chordsynth_platform::{Knob, ManualClock, SharedControl};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(short = 't', long, default_value = "5.0")]
    duration: f32,

    #[command(flatten)]
    sound: SoundArgs,
}

pub fn run(args: RenderArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    if !args.duration.is_finite() || args.duration <= 0.0 {
        anyhow::bail!("duration must be a positive number of seconds");
    }
    let config = load_config(config_path, &args.sound)?;

    let clock = ManualClock::new();
    let control = SharedControl::new(initial_state(&config, Duration::ZERO)?);
    let knob = Knob::from_normalized(config.control.volume);
    let render = render_config(&config);
    let step = render.buffer_duration();

    let total_frames = (f64::from(args.duration) * f64::from(render.sample_rate)).ceil() as usize;
    let buffers = total_frames.div_ceil(render.buffer_frames);

    println!(
        "Rendering {:.1}s of {} ({}) to {}",
        args.duration,
        config.synth.mode,
        config.synth.waveform,
        args.output.display()
    );

    let mut engine = RenderLoop::new(render, control, knob, clock.clone());
    let mut sink = WavSink::create(&args.output, config.audio.sample_rate)?;

    let pb = ProgressBar::new(buffers as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} buffers ({eta})")?
            .progress_chars("##-"),
    );

    for _ in 0..buffers {
        engine.render_iteration(&mut sink)?;
        clock.advance(step);
        pb.inc(1);
    }
    sink.finalize()?;
    pb.finish_with_message("done");

    let stats = engine.stats();
    println!(
        "Wrote {} frames ({} progression steps, final chord {})",
        sink.frames(),
        stats.progression_steps,
        engine.synth().mixer().chord_name()
    );
    Ok(())
}
