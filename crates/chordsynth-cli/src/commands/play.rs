//! Real-time playback command.
//!
//! Audio renders on a dedicated thread pinned to a core. The main thread is
//! the control thread: it applies commands typed on stdin and redraws the
//! status line at the configured frame rate.

use super::common::{SoundArgs, initial_state, load_config, render_config};
use crate::status::status_line;
use chordsynth_config::SynthConfig;
use chordsynth_io::{CpalSink, OutputConfig, RenderLoop};
use chordsynth_platform::{
    Clock, ControlEvent, Knob, PlayMode, SharedControl, SystemClock, WaveformShape,
};
use clap::Args;
use crossbeam_channel::{Receiver, bounded, never, select, tick};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    sound: SoundArgs,

    /// Output device (index, exact name, or partial name)
    #[arg(short, long)]
    device: Option<String>,

    /// Buffers queued ahead of the device
    #[arg(long)]
    queue_depth: Option<usize>,

    /// Do not draw the status line
    #[arg(short, long)]
    quiet: bool,
}

/// A line typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Event(ControlEvent),
    Volume(f32),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match (head, arg) {
        ("w" | "wave", None) => Command::Event(ControlEvent::CycleWaveform),
        ("w" | "wave", Some(name)) => {
            let shape: WaveformShape = name.parse().map_err(|e| format!("{e}"))?;
            Command::Event(ControlEvent::SetWaveform(shape))
        }
        ("m" | "mode", None) => Command::Event(ControlEvent::CycleMode),
        ("m" | "mode", Some(name)) => {
            let mode: PlayMode = name.parse().map_err(|e| format!("{e}"))?;
            Command::Event(ControlEvent::SetMode(mode))
        }
        ("u" | "unison", Some(n)) => {
            let n = n.parse().map_err(|_| format!("invalid unison count '{n}'"))?;
            Command::Event(ControlEvent::SetUnisonCount(n))
        }
        ("d" | "detune", Some(c)) => {
            let c = c.parse().map_err(|_| format!("invalid detune '{c}'"))?;
            Command::Event(ControlEvent::SetDetuneCents(c))
        }
        ("c" | "chord", None) => Command::Event(ControlEvent::NextChord),
        ("v" | "volume", Some(p)) => {
            let percent: f32 = p.parse().map_err(|_| format!("invalid volume '{p}'"))?;
            Command::Volume((percent / 100.0).clamp(0.0, 1.0))
        }
        ("h" | "help" | "?", None) => Command::Help,
        ("q" | "quit", None) => Command::Quit,
        _ => return Err(format!("unknown command '{}', type h for help", line.trim())),
    };
    Ok(Some(command))
}

fn print_help() {
    println!("Commands:");
    println!("  w [NAME]   cycle or set waveform (sine, triangle, square, sawtooth)");
    println!("  m [NAME]   cycle or set mode (single, chord, progression)");
    println!("  u N        unison voices per note (1-4)");
    println!("  d CENTS    unison detune (0-50)");
    println!("  c          next chord");
    println!("  v PERCENT  volume (0-100)");
    println!("  h          this help");
    println!("  q          quit (or Ctrl+C)");
}

/// Read commands from stdin on a background thread.
///
/// The channel disconnects at end of input.
fn spawn_stdin_reader() -> anyhow::Result<Receiver<Command>> {
    let (tx, rx) = bounded(16);
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => println!("\n{message}"),
                }
            }
        })?;
    Ok(rx)
}

fn pin_render_thread() {
    // Leave the first core to the control thread and the OS.
    let Some(core) = core_affinity::get_core_ids().and_then(|ids| ids.last().copied()) else {
        tracing::debug!("core ids unavailable, render thread not pinned");
        return;
    };
    if core_affinity::set_for_current(core) {
        tracing::info!(core = core.id, "render thread pinned");
    } else {
        tracing::warn!(core = core.id, "failed to pin render thread");
    }
}

pub fn run(args: PlayArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path, &args.sound)?;
    if let Some(device) = args.device {
        config.audio.device = Some(device);
    }
    if let Some(depth) = args.queue_depth {
        config.audio.queue_depth = depth;
    }
    config.validate()?;

    let clock = SystemClock::new();
    let control = SharedControl::new(initial_state(&config, clock.now())?);
    let knob = Knob::from_normalized(config.control.volume);

    let output = OutputConfig {
        sample_rate: config.audio.sample_rate,
        buffer_frames: config.audio.buffer_frames,
        queue_depth: config.audio.queue_depth,
        device: config.audio.device.clone(),
    };
    let mut sink = CpalSink::open(&output)?;

    println!("Playing on {}", sink.device_name());
    println!(
        "  {} Hz, {} frames x {} buffers",
        output.sample_rate, output.buffer_frames, output.queue_depth
    );
    print_help();
    println!();

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut engine = RenderLoop::new(render_config(&config), control.clone(), knob.clone(), clock);
    let render_running = Arc::clone(&running);
    let render = thread::Builder::new()
        .name("render".into())
        .spawn(move || {
            pin_render_thread();
            let result = engine.run(&mut sink, &render_running);
            // A sink failure ends the session.
            render_running.store(false, Ordering::SeqCst);
            result
        })?;

    let commands = spawn_stdin_reader()?;
    control_loop(&config, &control, &knob, clock, &running, commands, args.quiet);

    let stats = render
        .join()
        .map_err(|_| anyhow::anyhow!("render thread panicked"))??;
    println!(
        "\nStopped after {} buffers ({} lock fallbacks, {} progression steps)",
        stats.buffers, stats.snapshot_fallbacks, stats.progression_steps
    );
    Ok(())
}

fn control_loop(
    config: &SynthConfig,
    control: &SharedControl,
    knob: &Knob,
    clock: SystemClock,
    running: &AtomicBool,
    mut commands: Receiver<Command>,
    quiet: bool,
) {
    let timeout = config.control_lock_timeout();
    let ticker = tick(config.frame_interval());
    let mut stdout = std::io::stdout();

    while running.load(Ordering::SeqCst) {
        select! {
            recv(commands) -> msg => match msg {
                Ok(Command::Event(event)) => {
                    control.apply(event, clock.now(), timeout);
                }
                Ok(Command::Volume(volume)) => knob.set_normalized(volume),
                Ok(Command::Help) => print_help(),
                Ok(Command::Quit) => running.store(false, Ordering::SeqCst),
                // End of input: keep playing until Ctrl+C.
                Err(_) => commands = never(),
            },
            recv(ticker) -> _ => {
                if quiet {
                    continue;
                }
                if let Some(snap) = control.snapshot(timeout) {
                    let line = status_line(&snap, config.synth.tone_hz, clock.now().as_secs_f32());
                    print!("\r{line}  ");
                    let _ = stdout.flush();
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cycling_commands() {
        assert_eq!(
            parse_command("w"),
            Ok(Some(Command::Event(ControlEvent::CycleWaveform)))
        );
        assert_eq!(
            parse_command(" m "),
            Ok(Some(Command::Event(ControlEvent::CycleMode)))
        );
        assert_eq!(
            parse_command("c"),
            Ok(Some(Command::Event(ControlEvent::NextChord)))
        );
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn parses_commands_with_values() {
        assert_eq!(
            parse_command("w square"),
            Ok(Some(Command::Event(ControlEvent::SetWaveform(
                WaveformShape::Square
            ))))
        );
        assert_eq!(
            parse_command("mode prog"),
            Ok(Some(Command::Event(ControlEvent::SetMode(
                PlayMode::Progression
            ))))
        );
        assert_eq!(
            parse_command("u 3"),
            Ok(Some(Command::Event(ControlEvent::SetUnisonCount(3))))
        );
        assert_eq!(
            parse_command("d 12.5"),
            Ok(Some(Command::Event(ControlEvent::SetDetuneCents(12.5))))
        );
        assert_eq!(parse_command("v 50"), Ok(Some(Command::Volume(0.5))));
        assert_eq!(parse_command("v 250"), Ok(Some(Command::Volume(1.0))));
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse_command("u").is_err());
        assert!(parse_command("u many").is_err());
        assert!(parse_command("w noise").is_err());
        assert!(parse_command("x").is_err());
    }
}
