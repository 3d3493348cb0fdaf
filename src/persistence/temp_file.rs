// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scoped temporary file that is removed unless committed.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::PersistError;

/// A fully written temporary file next to its destination.
///
/// Dropping the guard without calling [`commit`](Self::commit) deletes the
/// file. A successful commit renames it over the destination, so there is
/// nothing left to clean up.
#[derive(Debug)]
pub(crate) struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Writes `bytes` to `.<name>.<uuid>.tmp` in the same directory as
    /// `destination`, flushes them to disk and closes the file.
    pub(crate) fn write_beside(destination: &Path, bytes: &[u8]) -> Result<Self, PersistError> {
        let name = destination
            .file_name()
            .ok_or_else(|| PersistError::InvalidPath(destination.to_path_buf()))?;
        let tmp_name = format!(
            ".{}.{}.tmp",
            name.to_string_lossy(),
            Uuid::new_v4().simple()
        );
        let path = destination.with_file_name(tmp_name);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| PersistError::CreateTemp {
                path: path.clone(),
                source,
            })?;
        let guard = Self { path };

        let written = file.write_all(bytes).and_then(|()| file.sync_all());
        // Closed before the guard can remove or rename it.
        drop(file);
        written.map_err(|source| PersistError::Write {
            path: guard.path.clone(),
            source,
        })?;
        Ok(guard)
    }

    /// Returns the temporary path.
    #[cfg(test)]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replaces `destination` with this file.
    pub(crate) fn commit(mut self, destination: &Path) -> Result<(), PersistError> {
        fs::rename(&self.path, destination).map_err(|source| PersistError::Rename {
            from: self.path.clone(),
            to: destination.to_path_buf(),
            source,
        })?;
        self.path = PathBuf::new();
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.path.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temporary snapshot file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_without_commit_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("state.json");
        fs::write(&destination, "committed").unwrap();

        let tmp = TempFile::write_beside(&destination, b"{\"leds\": {\"1\": \"o").unwrap();
        let tmp_path = tmp.path().to_path_buf();
        assert!(tmp_path.exists());
        assert_eq!(tmp_path.parent(), Some(dir.path()));

        drop(tmp);
        assert!(!tmp_path.exists());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "committed");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn commit_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("state.json");
        fs::write(&destination, "old").unwrap();

        let tmp = TempFile::write_beside(&destination, b"new").unwrap();
        let tmp_path = tmp.path().to_path_buf();
        tmp.commit(&destination).unwrap();

        assert_eq!(fs::read_to_string(&destination).unwrap(), "new");
        assert!(!tmp_path.exists());
    }

    #[test]
    fn failed_rename_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("state.json");
        // A non-empty directory at the destination makes the rename fail.
        fs::create_dir(&destination).unwrap();
        fs::write(destination.join("keep"), "x").unwrap();

        let tmp = TempFile::write_beside(&destination, b"new").unwrap();
        let tmp_path = tmp.path().to_path_buf();

        assert!(matches!(
            tmp.commit(&destination),
            Err(PersistError::Rename { .. })
        ));
        assert!(!tmp_path.exists());
        assert!(destination.join("keep").exists());
    }

    #[test]
    fn missing_directory_fails_to_create() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("missing").join("state.json");
        assert!(matches!(
            TempFile::write_beside(&destination, b"x"),
            Err(PersistError::CreateTemp { .. })
        ));
    }
}
