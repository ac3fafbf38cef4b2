//! Configuration for the chordsynth synthesizer.
//!
//! A single optional TOML file sets the output stream, the startup sound and
//! the control-thread timing. Missing fields fall back to defaults; values
//! the engine cannot honor are rejected by [`SynthConfig::validate`] before
//! any audio starts.
//!
//! # Example
//!
//! ```rust
//! use chordsynth_config::SynthConfig;
//!
//! let config = SynthConfig::from_toml(
//!     r#"
//!     [synth]
//!     mode = "progression"
//!     progression = "ii-v-i"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.progression().unwrap().len(), 3);
//! ```

mod config;
mod error;

/// Platform-specific configuration paths.
pub mod paths;

pub use config::{AudioConfig, ControlConfig, SoundConfig, SynthConfig};
pub use error::ConfigError;
pub use paths::{default_config_path, user_config_dir};
