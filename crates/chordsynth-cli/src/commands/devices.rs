//! Audio output device listing.

use chordsynth_io::list_output_devices;
use clap::Args;

#[derive(Args)]
pub struct DevicesArgs {}

pub fn run(_args: DevicesArgs) -> anyhow::Result<()> {
    let devices = list_output_devices()?;

    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    println!("Output Devices");
    println!("==============\n");
    for device in &devices {
        let default = if device.is_default { " (default)" } else { "" };
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            device.index, device.name, device.default_sample_rate, device.channels, default
        );
    }
    println!();
    println!("Tip: Use device index or partial name with --device:");
    println!("  chordsynth play --device 0");
    println!("  chordsynth play --device \"USB\"");
    Ok(())
}
