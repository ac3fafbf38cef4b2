//! Chord and progression library listing.

use chordsynth_synth::chord::{CHORDS, PROGRESSIONS};
use clap::Args;

#[derive(Args)]
pub struct ChordsArgs {
    /// Show note frequencies
    #[arg(short, long)]
    frequencies: bool,
}

pub fn run(args: ChordsArgs) -> anyhow::Result<()> {
    println!("Chords");
    println!("======\n");
    for chord in CHORDS {
        print!("  {:<8} {}", chord.name, chord.description);
        if args.frequencies {
            let hz: Vec<String> = chord.notes.iter().map(|f| format!("{f:.2}")).collect();
            print!("  ({} Hz)", hz.join(", "));
        }
        println!();
    }

    println!("\nProgressions");
    println!("============\n");
    for progression in PROGRESSIONS {
        let steps: Vec<&str> = progression.chords.iter().map(|c| c.name).collect();
        println!("  {:<8} {}", progression.name, steps.join(" -> "));
    }
    Ok(())
}
