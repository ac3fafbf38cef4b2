//! Effective configuration display.

use super::common::{SoundArgs, load_config};
use chordsynth_config::default_config_path;
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    /// Print the default config file location instead
    #[arg(long)]
    path: bool,

    #[command(flatten)]
    sound: SoundArgs,
}

pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    if args.path {
        println!("{}", default_config_path().display());
        return Ok(());
    }
    let config = load_config(config_path, &args.sound)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
