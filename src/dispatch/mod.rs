// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The operations offered to the command-driven caller.
//!
//! [`Dispatcher`] implements the three operations (activate, deactivate,
//! query) on top of a shared [`StateStore`]. Every operation is total: an
//! unknown or malformed device reference yields a rejection string, never an
//! error or a panic.
//!
//! [`ToolRegistry`] exposes the same operations by name, each behind the
//! [`Tool`] trait, for a decision-making collaborator that selects
//! operations at runtime.
//!
//! | Tool | Operation | Input |
//! |------|-----------|-------|
//! | `turn_on_led` | [`Dispatcher::activate`] | device id, number or text |
//! | `turn_off_led` | [`Dispatcher::deactivate`] | device id, number or text |
//! | `get_led_status` | [`Dispatcher::query_status`] | none |
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ledstate::DeviceRegistry;
//! use ledstate::dispatch::{Dispatcher, ToolRegistry};
//! use ledstate::persistence::SnapshotFile;
//! use ledstate::state::StateStore;
//! use serde_json::json;
//!
//! let store = Arc::new(StateStore::new(DeviceRegistry::default(), SnapshotFile::new("output.json")));
//! let dispatcher = Dispatcher::new(store);
//!
//! assert_eq!(dispatcher.activate(&1_u32.into()), "LED 1 turned on at GPIO 17.");
//!
//! let tools = ToolRegistry::for_dispatcher(&dispatcher);
//! let reply = tools.call("turn_off_led", &json!({ "led_number": "1" }));
//! assert_eq!(reply, "LED 1 turned off at GPIO 17.");
//! ```

mod registry;
mod tool;

use std::fmt;
use std::sync::Arc;

pub use registry::{ToolCall, ToolRegistry};
pub use tool::{StatusTool, SwitchTool, Tool, ToolSpec};

use crate::error::Error;
use crate::state::StateStore;
use crate::types::{DeviceRef, LedState};

/// Validates device references and applies them to the state store.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: Arc<StateStore>,
}

impl Dispatcher {
    /// Creates a dispatcher over a shared store.
    #[must_use]
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Turns a device on.
    ///
    /// Returns a confirmation naming the device and its pin, or a rejection
    /// if the reference is not a registered id.
    #[must_use]
    pub fn activate(&self, device: &DeviceRef) -> String {
        self.switch(device, LedState::On)
    }

    /// Turns a device off.
    ///
    /// Same contract as [`activate`](Self::activate).
    #[must_use]
    pub fn deactivate(&self, device: &DeviceRef) -> String {
        self.switch(device, LedState::Off)
    }

    /// Returns the current state in its wire form.
    #[must_use]
    pub fn query_status(&self) -> String {
        self.store.snapshot().to_json()
    }

    /// Builds the rejection message for an unusable device reference.
    #[must_use]
    pub fn rejection(&self, reference: impl fmt::Display) -> String {
        format!(
            "Invalid LED id '{reference}'. Use LED ids {}.",
            self.store.registry().describe_ids()
        )
    }

    fn switch(&self, device: &DeviceRef, state: LedState) -> String {
        let id = device.normalize();
        match self.store.update(&id, state) {
            Ok(commit) => format!("LED {id} turned {state} at GPIO {}.", commit.pin),
            Err(Error::UnknownDevice { .. }) => {
                tracing::debug!(device = %device, "Rejected unknown LED id");
                self.rejection(&id)
            }
            Err(e) => format!("LED {id} could not be turned {state}: {e}."),
        }
    }
}
