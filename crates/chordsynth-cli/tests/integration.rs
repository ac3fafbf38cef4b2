//! Integration tests for the chordsynth binary.

use std::path::Path;
use std::process::Command;

/// Helper to get the path to the `chordsynth` binary built by cargo.
fn chordsynth_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chordsynth"))
}

/// Empty config file, so tests never pick up the user's own config.
fn empty_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, "").unwrap();
    path
}

// ---------------------------------------------------------------------------
// `chordsynth chords`
// ---------------------------------------------------------------------------

#[test]
fn chords_lists_library() {
    let output = chordsynth_bin()
        .args(["chords", "--frequencies"])
        .output()
        .expect("failed to run chordsynth chords");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["Cm7", "Ebmaj7", "Abmaj7", "Gmaj7", "Dm7", "Fmaj7"] {
        assert!(stdout.contains(name), "listing should contain '{name}'");
    }
    assert!(stdout.contains("jazz"));
    assert!(stdout.contains("Ebmaj7 -> Cm7 -> Abmaj7 -> Abmaj7"));
    assert!(stdout.contains("261.63"));
}

// ---------------------------------------------------------------------------
// `chordsynth render`
// ---------------------------------------------------------------------------

#[test]
fn render_writes_wav() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let wav = dir.path().join("out.wav");

    let output = chordsynth_bin()
        .arg("--config")
        .arg(&config)
        .arg("render")
        .arg(&wav)
        .args(["--duration", "0.1", "--mode", "chord", "--unison", "2"])
        .output()
        .expect("failed to run chordsynth render");
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let mut reader = hound::WavReader::open(&wav).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    // 0.1 s rounds up to whole 256-frame buffers.
    assert_eq!(samples.len(), 18 * 256 * 2);
    assert!(samples.chunks(2).all(|f| f[0] == f[1]));
    assert!(samples.iter().any(|&s| s != 0));
}

#[test]
fn render_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());

    let render = |name: &str| {
        let wav = dir.path().join(name);
        let status = chordsynth_bin()
            .arg("--config")
            .arg(&config)
            .arg("render")
            .arg(&wav)
            .args(["--duration", "0.05", "--mode", "progression", "-w", "sawtooth"])
            .status()
            .unwrap();
        assert!(status.success());
        std::fs::read(wav).unwrap()
    };
    assert_eq!(render("a.wav"), render("b.wav"));
}

#[test]
fn render_rejects_out_of_range_unison() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());

    let output = chordsynth_bin()
        .arg("--config")
        .arg(&config)
        .arg("render")
        .arg(dir.path().join("x.wav"))
        .args(["--unison", "9"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!dir.path().join("x.wav").exists());
}

// ---------------------------------------------------------------------------
// `chordsynth config`
// ---------------------------------------------------------------------------

#[test]
fn config_prints_effective_settings() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[synth]\nchord = \"Dm7\"\n").unwrap();

    let output = chordsynth_bin()
        .arg("--config")
        .arg(&config)
        .args(["config", "--unison", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed = chordsynth_config::SynthConfig::from_toml(&stdout).unwrap();
    assert_eq!(parsed.synth.chord, "Dm7");
    assert_eq!(parsed.synth.unison, 3);
}

#[test]
fn missing_config_file_fails() {
    let output = chordsynth_bin()
        .args(["--config", "/nonexistent/chordsynth.toml", "chords"])
        .output()
        .unwrap();
    // `chords` does not read the config, so a bad path is harmless there.
    assert!(output.status.success());

    let output = chordsynth_bin()
        .args(["--config", "/nonexistent/chordsynth.toml", "config"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
