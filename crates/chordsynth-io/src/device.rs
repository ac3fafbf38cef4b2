//! Output device discovery via cpal.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Output device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Position in the host's output device list.
    pub index: usize,
    /// Human-readable device name.
    pub name: String,
    /// Whether this is the host's default output.
    pub is_default: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub channels: u16,
}

/// List every output device of the default host.
pub fn list_output_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());

    let outputs = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;

    let mut devices = Vec::new();
    for (index, device) in outputs.enumerate() {
        let Ok(name) = device_name(&device) else {
            continue;
        };
        let (default_sample_rate, channels) = device
            .default_output_config()
            .map(|c| (c.sample_rate(), c.channels()))
            .unwrap_or((44100, 2));
        devices.push(AudioDevice {
            index,
            is_default: default_name.as_deref() == Some(name.as_str()),
            name,
            default_sample_rate,
            channels,
        });
    }
    Ok(devices)
}

/// Resolve an output device by index, exact name, or case-insensitive
/// partial name. `None` selects the host default.
pub(crate) fn find_output_device(host: &Host, name_or_index: Option<&str>) -> Result<Device> {
    let Some(search) = name_or_index else {
        return host.default_output_device().ok_or(Error::NoDevice);
    };

    let devices: Vec<Device> = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .collect();

    if let Ok(index) = search.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "output device index {index} (only {} devices available)",
                devices.len()
            ))
        });
    }

    if let Some(device) = devices
        .iter()
        .find(|d| device_name(d).is_ok_and(|n| n == search))
    {
        return Ok(device.clone());
    }

    let search_lower = search.to_lowercase();
    devices
        .iter()
        .find(|d| device_name(d).is_ok_and(|n| n.to_lowercase().contains(&search_lower)))
        .cloned()
        .ok_or_else(|| Error::DeviceNotFound(format!("no output device matching '{search}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_does_not_panic_without_hardware() {
        // Device availability depends on the system; only the call must be safe.
        let _ = list_output_devices();
    }

    #[test]
    fn out_of_range_index_is_not_found() {
        let host = cpal::default_host();
        let result = find_output_device(&host, Some("9999"));
        assert!(result.is_err());
    }
}
