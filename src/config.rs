// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Store configuration and startup.

use std::path::PathBuf;

use crate::driver::{NullDriver, PinDriver};
use crate::persistence::SnapshotFile;
use crate::registry::DeviceRegistry;
use crate::state::StateStore;

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "output.json";

/// Configuration for opening a [`StateStore`].
///
/// # Examples
///
/// ```no_run
/// use ledstate::{DeviceRegistry, StoreConfig};
///
/// let store = StoreConfig::new("/var/lib/ledstate/state.json")
///     .with_registry(DeviceRegistry::builder().device("porch", 5).build()?)
///     .open();
/// # Ok::<(), ledstate::error::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct StoreConfig {
    /// Snapshot file path.
    pub snapshot_path: PathBuf,
    /// Device registry.
    pub registry: DeviceRegistry,
    /// Hardware driver.
    pub driver: Box<dyn PinDriver>,
}

impl StoreConfig {
    /// Creates a configuration with the default registry and no hardware.
    #[must_use]
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            registry: DeviceRegistry::default(),
            driver: Box::new(NullDriver),
        }
    }

    /// Sets the device registry.
    #[must_use]
    pub fn with_registry(mut self, registry: DeviceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the hardware driver.
    #[must_use]
    pub fn with_driver(mut self, driver: impl PinDriver + 'static) -> Self {
        self.driver = Box::new(driver);
        self
    }

    /// Builds the store from the snapshot file.
    ///
    /// Loading never fails; see [`StateStore::open`].
    #[must_use]
    pub fn open(self) -> StateStore {
        let store = StateStore::open(
            self.registry,
            SnapshotFile::new(self.snapshot_path),
            self.driver,
        );
        tracing::info!(
            path = %store.path().display(),
            devices = store.registry().len(),
            outcome = ?store.load_outcome(),
            "State store ready"
        );
        store
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::state::LoadOutcome;
    use crate::types::{DeviceId, LedState};

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.snapshot_path, PathBuf::from("output.json"));
        assert_eq!(config.registry, DeviceRegistry::default());
    }

    #[test]
    fn open_loads_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"leds": {"2": "on"}, "updated_at": null}"#).unwrap();

        let store = StoreConfig::new(&path).open();

        assert_eq!(store.snapshot().state("2"), Some(LedState::On));
        assert_eq!(store.load_outcome(), Some(LoadOutcome::Loaded { dropped: 0 }));
    }

    #[test]
    fn open_with_custom_registry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DeviceRegistry::builder()
            .device("porch", 5)
            .build()
            .unwrap();

        let store = StoreConfig::new(dir.path().join("state.json"))
            .with_registry(registry)
            .open();

        assert!(store.update(&DeviceId::new("porch"), LedState::On).is_ok());
        assert!(store.update(&DeviceId::new("1"), LedState::On).is_err());
    }
}
