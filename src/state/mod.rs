// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.
//!
//! [`StateStore`] owns the live state of every registered device and mirrors
//! it to a [`SnapshotFile`](crate::persistence::SnapshotFile) after each
//! change. [`StateSnapshot`] is the immutable copy handed to readers.
//!
//! # Examples
//!
//! ```
//! use ledstate::DeviceRegistry;
//! use ledstate::persistence::SnapshotFile;
//! use ledstate::state::StateStore;
//! use ledstate::types::{DeviceId, LedState};
//!
//! let dir = std::env::temp_dir().join(format!("ledstate-doc-{}", std::process::id()));
//! std::fs::create_dir_all(&dir).unwrap();
//! let store = StateStore::new(DeviceRegistry::default(), SnapshotFile::new(dir.join("state.json")));
//!
//! store.update(&DeviceId::new("2"), LedState::On).unwrap();
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.state("2"), Some(LedState::On));
//! assert!(snapshot.updated_at().is_some());
//! # std::fs::remove_dir_all(&dir).unwrap();
//! ```

mod snapshot;
mod store;

pub use snapshot::StateSnapshot;
pub use store::{Commit, LoadOutcome, StateStore};
