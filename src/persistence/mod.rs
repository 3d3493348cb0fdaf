// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Durable snapshot storage.
//!
//! Persistence is advisory: the in-memory store stays authoritative and a
//! failed write is reported as a [`PersistError`](crate::error::PersistError)
//! value, never as a panic. The file format is:
//!
//! ```json
//! {
//!   "leds": { "1": "on", "2": "off", "3": "off", "4": "off" },
//!   "updated_at": "2024-01-01T00:00:00+00:00"
//! }
//! ```

mod snapshot_file;
mod temp_file;

pub use snapshot_file::{RawSnapshot, SnapshotFile};
