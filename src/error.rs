// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `ledstate` crate.
//!
//! Only [`Error::UnknownDevice`] is ever surfaced to a dispatch caller, and
//! then only as text. [`SnapshotError`], [`PersistError`] and
//! [`DriverError`] are contained by the state store, which logs them.
//! [`ConfigError`] is returned while building a registry.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The device reference is not part of the registry.
    #[error("unknown device: {id}")]
    UnknownDevice {
        /// The normalized id that was looked up.
        id: String,
    },

    /// The decision-making agent failed to produce a reply.
    #[error("agent error: {0}")]
    Agent(String),
}

/// Errors related to value parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An invalid LED state string was provided.
    #[error("invalid LED state: {0}")]
    InvalidLedState(String),

    /// A device reference could not be read from tool input.
    #[error("invalid device reference: {0}")]
    InvalidDeviceRef(String),
}

/// Errors returned when reading a persisted snapshot.
///
/// Both variants are recovered by falling back to the default state.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The file is missing or unreadable.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file content is not a structurally valid snapshot.
    #[error("corrupt snapshot {}: {source}", .path.display())]
    Corrupt {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl SnapshotError {
    /// Returns `true` if the snapshot file simply does not exist yet.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Errors returned when writing a snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The destination path has no file name.
    #[error("invalid snapshot path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// The temporary file could not be created.
    #[error("failed to create temporary file {}: {source}", .path.display())]
    CreateTemp {
        /// Temporary file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing or syncing the temporary file failed.
    #[error("failed to write temporary file {}: {source}", .path.display())]
    Write {
        /// Temporary file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Renaming the temporary file over the destination failed.
    #[error("failed to rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        /// Temporary file path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors reported by a [`PinDriver`](crate::driver::PinDriver).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Writing the pin level failed.
    #[error("failed to drive GPIO {pin}: {message}")]
    WriteFailed {
        /// The physical pin.
        pin: u8,
        /// Description of the failure.
        message: String,
    },
}

/// Errors related to registry and store configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The registry has no devices.
    #[error("device registry is empty")]
    EmptyRegistry,

    /// A device id is blank.
    #[error("device id must not be blank")]
    BlankId,

    /// A device id was registered twice.
    #[error("duplicate device id: {0}")]
    DuplicateId(String),

    /// A `<id>=<pin>` mapping could not be parsed.
    #[error("invalid device mapping '{0}', expected <id>=<pin>")]
    InvalidMapping(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
