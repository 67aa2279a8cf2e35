use anyhow::{Context, bail};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

pub fn list_input_devices(host: &Host) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(devices) = host.input_devices() {
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
    }
    names
}

pub fn default_input_name(host: &Host) -> Option<String> {
    host.default_input_device().and_then(|d| d.name().ok())
}

/// Resolve an input device from a selector: a numeric index into the device
/// list, a case-insensitive name fragment, or None for the default input.
pub fn find_input_device(host: &Host, selector: Option<&str>) -> anyhow::Result<Device> {
    let Some(selector) = selector else {
        return host
            .default_input_device()
            .context("no default input device available");
    };

    let mut devices: Vec<Device> = host
        .input_devices()
        .context("failed to enumerate input devices")?
        .collect();

    if let Ok(index) = selector.parse::<usize>() {
        if index < devices.len() {
            return Ok(devices.swap_remove(index));
        }
        bail!("device index {index} out of range ({} devices)", devices.len());
    }

    let wanted = selector.to_lowercase();
    for device in devices {
        if let Ok(name) = device.name() {
            if name.to_lowercase().contains(&wanted) {
                return Ok(device);
            }
        }
    }
    bail!("no input device matching \"{selector}\"");
}
