use crate::capture::CaptureSource;
use crate::error::ConfigureError;
use crate::resolution::{select_resolution, Resolution};

/// A device that was left out of the configured set
#[derive(Debug)]
pub struct Rejected {
    pub device: String,
    pub error: ConfigureError,
}

/// An enumerated device after configuration
///
/// Slots keep their enumeration position, so a rejected device still
/// occupies its index.
pub enum DeviceSlot<D> {
    Ready(D),
    Rejected(Rejected),
}

impl<D: CaptureSource> DeviceSlot<D> {
    pub fn name(&self) -> &str {
        match self {
            Self::Ready(device) => device.name(),
            Self::Rejected(rejected) => &rejected.device,
        }
    }
}

impl<D> From<D> for DeviceSlot<D> {
    fn from(device: D) -> Self {
        Self::Ready(device)
    }
}

/// Result of one configuration pass, one slot per input device
pub struct Configured<D> {
    slots: Vec<DeviceSlot<D>>,
}

impl<D> Configured<D> {
    /// Wrap devices that have not been through configuration yet
    pub fn unconfigured(devices: Vec<D>) -> Self {
        Self {
            slots: devices.into_iter().map(DeviceSlot::Ready).collect(),
        }
    }

    pub fn from_slots(slots: Vec<DeviceSlot<D>>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[DeviceSlot<D>] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [DeviceSlot<D>] {
        &mut self.slots
    }

    pub fn into_slots(self) -> Vec<DeviceSlot<D>> {
        self.slots
    }

    /// Devices running at their selected resolution, in enumeration order
    pub fn devices(&self) -> impl Iterator<Item = &D> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            DeviceSlot::Ready(device) => Some(device),
            DeviceSlot::Rejected(_) => None,
        })
    }

    /// One entry per device that could not be configured
    pub fn rejected(&self) -> impl Iterator<Item = &Rejected> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            DeviceSlot::Ready(_) => None,
            DeviceSlot::Rejected(rejected) => Some(rejected),
        })
    }
}

/// Apply the best resolution under `cap` to every device
///
/// Each device is handled on its own: a device whose resolution cannot be
/// applied is marked rejected and reported, and the pass moves on to the
/// next one.
pub fn configure<D: CaptureSource>(devices: Vec<D>, cap: Resolution) -> Configured<D> {
    let _span = tracing::debug_span!("configure", cap = %cap).entered();

    Configured::from_slots(
        devices
            .into_iter()
            .map(|device| configure_device(device, cap))
            .collect(),
    )
}

/// Configure a single device, see [`configure`]
pub fn configure_device<D: CaptureSource>(mut device: D, cap: Resolution) -> DeviceSlot<D> {
    match configure_one(&mut device, cap) {
        Ok(selected) => {
            tracing::info!("Configured {} with resolution {}", device.name(), selected);
            DeviceSlot::Ready(device)
        }
        Err(error) => {
            tracing::warn!("Failed to configure webcam {}: {}", device.name(), error);
            DeviceSlot::Rejected(Rejected {
                device: device.name().to_string(),
                error,
            })
        }
    }
}

fn configure_one<D: CaptureSource>(
    device: &mut D,
    cap: Resolution,
) -> Result<Resolution, ConfigureError> {
    let selected =
        select_resolution(device.supported_resolutions(), cap).ok_or(ConfigureError::NoModes)?;

    device
        .apply_resolution(selected)
        .map_err(|reason| ConfigureError::Apply {
            resolution: selected,
            reason,
        })?;

    Ok(selected)
}
