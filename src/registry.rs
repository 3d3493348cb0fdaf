// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static mapping from logical device id to GPIO pin.

use std::str::FromStr;

use crate::error::{ConfigError, Error, Result};
use crate::types::{DeviceId, GpioPin};

/// The default LED wiring: `1→17, 2→27, 3→22, 4→23`.
const DEFAULT_WIRING: [(&str, u8); 4] = [("1", 17), ("2", 27), ("3", 22), ("4", 23)];

/// A single registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Logical device id.
    pub id: DeviceId,
    /// Physical address the device is wired to.
    pub pin: GpioPin,
}

impl FromStr for Device {
    type Err = ConfigError;

    /// Parses an `<id>=<pin>` mapping, as given on the command line.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (id, pin) = s
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidMapping(s.to_string()))?;
        let pin = pin
            .trim()
            .parse::<u8>()
            .map_err(|_| ConfigError::InvalidMapping(s.to_string()))?;
        let id = DeviceId::new(id);
        if id.is_blank() {
            return Err(ConfigError::BlankId);
        }
        Ok(Self {
            id,
            pin: GpioPin::new(pin),
        })
    }
}

/// The closed set of devices known to the process.
///
/// The registry is built once and never changes afterwards. Its id set is
/// the exact key set of every [`StateSnapshot`](crate::state::StateSnapshot).
///
/// # Examples
///
/// ```
/// use ledstate::DeviceRegistry;
/// use ledstate::types::{DeviceId, GpioPin};
///
/// let registry = DeviceRegistry::default();
/// assert_eq!(registry.lookup(&DeviceId::new("2")).unwrap(), GpioPin::new(27));
/// assert!(registry.lookup(&DeviceId::new("9")).is_err());
///
/// let custom = DeviceRegistry::builder()
///     .device("kitchen", 5)
///     .device("hall", 6)
///     .build()
///     .unwrap();
/// assert_eq!(custom.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Starts building a custom registry.
    #[must_use]
    pub fn builder() -> DeviceRegistryBuilder {
        DeviceRegistryBuilder::default()
    }

    /// Returns the pin wired to `id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDevice` if `id` is not registered.
    pub fn lookup(&self, id: &DeviceId) -> Result<GpioPin> {
        self.devices
            .iter()
            .find(|device| &device.id == id)
            .map(|device| device.pin)
            .ok_or_else(|| Error::UnknownDevice {
                id: id.to_string(),
            })
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.devices.iter().any(|device| device.id.as_str() == id)
    }

    /// Returns the registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices.iter().map(|device| &device.id)
    }

    /// Returns the registered devices in registration order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Always `false`; an empty registry cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Human-readable list of ids, e.g. `1, 2, 3, or 4`.
    #[must_use]
    pub fn describe_ids(&self) -> String {
        let ids: Vec<&str> = self.ids().map(DeviceId::as_str).collect();
        match ids.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            [a, b] => format!("{a} or {b}"),
            [init @ .., last] => format!("{}, or {last}", init.join(", ")),
        }
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self {
            devices: DEFAULT_WIRING
                .iter()
                .map(|(id, pin)| Device {
                    id: DeviceId::new(id),
                    pin: GpioPin::new(*pin),
                })
                .collect(),
        }
    }
}

/// Builder for a [`DeviceRegistry`].
#[derive(Debug, Default)]
pub struct DeviceRegistryBuilder {
    devices: Vec<Device>,
}

impl DeviceRegistryBuilder {
    /// Adds a device.
    #[must_use]
    pub fn device(mut self, id: impl AsRef<str>, pin: u8) -> Self {
        self.devices.push(Device {
            id: DeviceId::new(id),
            pin: GpioPin::new(pin),
        });
        self
    }

    /// Adds a parsed device entry.
    #[must_use]
    pub fn entry(mut self, device: Device) -> Self {
        self.devices.push(device);
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the registry is empty, or an id is blank or
    /// registered twice.
    pub fn build(self) -> std::result::Result<DeviceRegistry, ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        for (i, device) in self.devices.iter().enumerate() {
            if device.id.is_blank() {
                return Err(ConfigError::BlankId);
            }
            if self.devices[..i].iter().any(|other| other.id == device.id) {
                return Err(ConfigError::DuplicateId(device.id.to_string()));
            }
        }
        Ok(DeviceRegistry {
            devices: self.devices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wiring() {
        let registry = DeviceRegistry::default();
        let pins: Vec<u8> = registry.devices().iter().map(|d| d.pin.number()).collect();
        assert_eq!(pins, vec![17, 27, 22, 23]);
        assert!(registry.contains("4"));
        assert!(!registry.contains("5"));
    }

    #[test]
    fn lookup_unknown_device() {
        let registry = DeviceRegistry::default();
        let err = registry.lookup(&DeviceId::new("0")).unwrap_err();
        assert!(matches!(err, Error::UnknownDevice { id } if id == "0"));
    }

    #[test]
    fn builder_rejects_empty() {
        assert_eq!(
            DeviceRegistry::builder().build().unwrap_err(),
            ConfigError::EmptyRegistry
        );
    }

    #[test]
    fn builder_rejects_duplicates_and_blanks() {
        let err = DeviceRegistry::builder()
            .device("1", 17)
            .device(" 1", 18)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateId("1".to_string()));

        let err = DeviceRegistry::builder().device("  ", 17).build().unwrap_err();
        assert_eq!(err, ConfigError::BlankId);
    }

    #[test]
    fn describe_ids() {
        assert_eq!(DeviceRegistry::default().describe_ids(), "1, 2, 3, or 4");

        let two = DeviceRegistry::builder()
            .device("a", 1)
            .device("b", 2)
            .build()
            .unwrap();
        assert_eq!(two.describe_ids(), "a or b");
    }

    #[test]
    fn parse_device_mapping() {
        let device: Device = "5=24".parse().unwrap();
        assert_eq!(device.id.as_str(), "5");
        assert_eq!(device.pin, GpioPin::new(24));

        assert!("5".parse::<Device>().is_err());
        assert!("5=pin".parse::<Device>().is_err());
        assert_eq!("=4".parse::<Device>().unwrap_err(), ConfigError::BlankId);
    }
}
