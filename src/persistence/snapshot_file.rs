// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reading and atomically writing the snapshot file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PersistError, SnapshotError};
use crate::state::StateSnapshot;

use super::temp_file::TempFile;

/// A snapshot file as found on disk, before validation against a registry.
///
/// Only the outer shape is enforced here: `leds` must be an object and the
/// document must be an object. Individual entries and the timestamp are
/// checked when the snapshot is merged into the store.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshot {
    /// Device id to state, unchecked.
    pub leds: HashMap<String, Value>,
    /// Last-updated timestamp, unchecked.
    #[serde(default)]
    pub updated_at: Value,
}

/// Durable mirror of the state store at a fixed path.
///
/// Writers go through a temporary file in the same directory followed by a
/// rename, so a concurrent reader only ever sees the previous or the new
/// complete document.
///
/// # Examples
///
/// ```no_run
/// use ledstate::DeviceRegistry;
/// use ledstate::persistence::SnapshotFile;
/// use ledstate::state::StateSnapshot;
///
/// let file = SnapshotFile::new("output.json");
/// let snapshot = StateSnapshot::defaults(&DeviceRegistry::default());
/// if let Err(e) = file.persist(&snapshot) {
///     eprintln!("snapshot not saved: {e}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Creates a handle for the snapshot at `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `snapshot` to the destination atomically.
    ///
    /// On failure the destination is left untouched and the temporary file
    /// is removed.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if serialization, the temporary write or the
    /// rename fails.
    pub fn persist(&self, snapshot: &StateSnapshot) -> Result<(), PersistError> {
        let mut json = serde_json::to_string_pretty(snapshot)?;
        json.push('\n');

        TempFile::write_beside(&self.path, json.as_bytes())?.commit(&self.path)?;

        tracing::debug!(path = %self.path.display(), "Persisted LED snapshot");
        Ok(())
    }

    /// Reads and structurally validates the snapshot file.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Io` if the file is missing or unreadable, and
    /// `SnapshotError::Corrupt` if it is not a valid snapshot document.
    pub fn read(&self) -> Result<RawSnapshot, SnapshotError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| SnapshotError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}
