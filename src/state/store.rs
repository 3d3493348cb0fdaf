// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The authoritative in-memory state store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::Mutex;

use crate::driver::{NullDriver, PinDriver};
use crate::error::Result;
use crate::persistence::SnapshotFile;
use crate::registry::DeviceRegistry;
use crate::types::{DeviceId, GpioPin, LedState};

use super::StateSnapshot;

/// How [`StateStore::open`] read the snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read and merged. `dropped` entries were not recognized.
    Loaded {
        /// Entries ignored because of an unknown id or an invalid value.
        dropped: usize,
    },
    /// No snapshot file exists yet; defaults are in use.
    Missing,
    /// The file was unreadable or corrupt; defaults are in use.
    Fallback,
}

/// A committed state change, as returned by [`StateStore::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    /// Pin of the updated device.
    pub pin: GpioPin,
    /// The state that was recorded.
    pub state: LedState,
    /// Position of this change in the store's total order of updates.
    pub sequence: u64,
}

#[derive(Debug)]
struct Inner {
    snapshot: StateSnapshot,
    sequence: u64,
}

/// Last sequence applied to each side effect, so a stale commit never
/// overwrites a newer one.
#[derive(Debug, Default)]
struct Applied {
    file: u64,
    pins: HashMap<GpioPin, u64>,
}

impl Applied {
    fn admit_pin(&mut self, pin: GpioPin, sequence: u64) -> bool {
        let last = self.pins.entry(pin).or_insert(0);
        if *last >= sequence {
            return false;
        }
        *last = sequence;
        true
    }
}

/// Owns the device state for the lifetime of the process.
///
/// A single mutex guards the aggregate. It is held only long enough to
/// apply a change and copy the result out; driving the hardware and writing
/// the snapshot file happen after it is released, under a separate lock.
/// A commit older than one already applied to the same pin is not driven,
/// and a copy older than one already on disk is not written, so both the
/// pins and the file converge on the latest state.
///
/// The snapshot file is read once, by [`open`](Self::open), before the
/// store can be shared. After that the in-memory state is authoritative.
///
/// Persistence failures are deliberately not returned to callers. They are
/// logged at `warn` level and counted in
/// [`persist_failures`](Self::persist_failures).
///
/// # Examples
///
/// ```no_run
/// use ledstate::{DeviceRegistry, NullDriver};
/// use ledstate::persistence::SnapshotFile;
/// use ledstate::state::StateStore;
/// use ledstate::types::{DeviceId, LedState};
///
/// let store = StateStore::open(
///     DeviceRegistry::default(),
///     SnapshotFile::new("output.json"),
///     Box::new(NullDriver),
/// );
///
/// store.update(&DeviceId::new("1"), LedState::On)?;
/// assert_eq!(store.snapshot().state("1"), Some(LedState::On));
/// # Ok::<(), ledstate::Error>(())
/// ```
#[derive(Debug)]
pub struct StateStore {
    registry: DeviceRegistry,
    file: SnapshotFile,
    driver: Box<dyn PinDriver>,
    inner: Mutex<Inner>,
    applied: Mutex<Applied>,
    load_outcome: Option<LoadOutcome>,
    persist_failures: AtomicU64,
}

impl StateStore {
    /// Creates a store with every device off. The snapshot file is not read.
    #[must_use]
    pub fn new(registry: DeviceRegistry, file: SnapshotFile) -> Self {
        Self::with_driver(registry, file, Box::new(NullDriver))
    }

    /// Creates a store that actuates devices through `driver`. The snapshot
    /// file is not read.
    #[must_use]
    pub fn with_driver(
        registry: DeviceRegistry,
        file: SnapshotFile,
        driver: Box<dyn PinDriver>,
    ) -> Self {
        let snapshot = StateSnapshot::defaults(&registry);
        Self::assemble(registry, file, driver, snapshot, None)
    }

    /// Creates a store from defaults overlaid by the snapshot file.
    ///
    /// Never fails: a missing, unreadable or corrupt file leaves the
    /// defaults in place. The result is available from
    /// [`load_outcome`](Self::load_outcome).
    #[must_use]
    pub fn open(registry: DeviceRegistry, file: SnapshotFile, driver: Box<dyn PinDriver>) -> Self {
        let mut snapshot = StateSnapshot::defaults(&registry);
        let outcome = match file.read() {
            Ok(raw) => {
                let dropped = snapshot.overlay(raw);
                tracing::debug!(path = %file.path().display(), dropped, "Loaded LED snapshot");
                LoadOutcome::Loaded { dropped }
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    path = %file.path().display(),
                    "No LED snapshot found, using defaults"
                );
                LoadOutcome::Missing
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unusable LED snapshot, using defaults");
                LoadOutcome::Fallback
            }
        };
        Self::assemble(registry, file, driver, snapshot, Some(outcome))
    }

    fn assemble(
        registry: DeviceRegistry,
        file: SnapshotFile,
        driver: Box<dyn PinDriver>,
        snapshot: StateSnapshot,
        load_outcome: Option<LoadOutcome>,
    ) -> Self {
        Self {
            registry,
            file,
            driver,
            inner: Mutex::new(Inner {
                snapshot,
                sequence: 0,
            }),
            applied: Mutex::new(Applied::default()),
            load_outcome,
            persist_failures: AtomicU64::new(0),
        }
    }

    /// Returns the device registry.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Returns the snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns how the snapshot file was read, or `None` if the store was
    /// created without reading it.
    #[must_use]
    pub fn load_outcome(&self) -> Option<LoadOutcome> {
        self.load_outcome
    }

    /// Returns a copy of the current state. Never touches the filesystem.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner.lock().snapshot.clone()
    }

    /// Sets `id` to `state`, drives the pin and persists the result.
    ///
    /// The state and its timestamp change together inside one critical
    /// section. The call returns once the write has been attempted; a
    /// failed write still yields `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDevice` if `id` is not registered. Nothing is
    /// changed or written in that case.
    pub fn update(&self, id: &DeviceId, state: LedState) -> Result<Commit> {
        let (commit, copy) = self.commit(id, state)?;
        tracing::info!(device = %id, pin = commit.pin.number(), state = %state, "LED state changed");
        self.apply(id, commit, &copy);
        Ok(commit)
    }

    /// Number of snapshot writes that failed since the store was created.
    #[must_use]
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::Relaxed)
    }

    fn commit(&self, id: &DeviceId, state: LedState) -> Result<(Commit, StateSnapshot)> {
        let pin = self.registry.lookup(id)?;
        let mut inner = self.inner.lock();
        inner.snapshot.set(id, state, Utc::now());
        inner.sequence += 1;
        let commit = Commit {
            pin,
            state,
            sequence: inner.sequence,
        };
        Ok((commit, inner.snapshot.clone()))
    }

    fn apply(&self, id: &DeviceId, commit: Commit, snapshot: &StateSnapshot) {
        let mut applied = self.applied.lock();

        if applied.admit_pin(commit.pin, commit.sequence) {
            if let Err(e) = self.driver.write(commit.pin, commit.state.level()) {
                tracing::warn!(device = %id, error = %e, "GPIO write failed");
            }
        } else {
            tracing::trace!(device = %id, sequence = commit.sequence, "Skipping superseded GPIO write");
        }

        if applied.file >= commit.sequence {
            tracing::trace!(
                sequence = commit.sequence,
                written = applied.file,
                "Skipping superseded snapshot write"
            );
            return;
        }
        match self.file.persist(snapshot) {
            Ok(()) => applied.file = commit.sequence,
            Err(e) => {
                self.persist_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "Failed to persist LED snapshot");
            }
        }
    }
}
