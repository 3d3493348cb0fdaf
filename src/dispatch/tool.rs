// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named operations callable by a decision-making collaborator.

use serde::Serialize;
use serde_json::{Value, json};

use crate::types::{DeviceRef, LedState};

use super::Dispatcher;

/// An operation that can be invoked by name with JSON input.
///
/// Implementations must be total: every input produces a reply string.
pub trait Tool: Send + Sync {
    /// Returns the operation name, e.g. `"turn_on_led"`.
    fn name(&self) -> &'static str;

    /// Returns a one-line description for the collaborator.
    fn description(&self) -> String;

    /// Returns a JSON Schema describing the accepted input.
    fn parameters(&self) -> Value;

    /// Runs the operation.
    fn execute(&self, input: &Value) -> String;

    /// Returns the advertised description of this tool.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name(),
            description: self.description(),
            parameters: self.parameters(),
        }
    }
}

/// How a tool is advertised to a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    /// Operation name.
    pub name: &'static str,
    /// One-line description.
    pub description: String,
    /// JSON Schema of the input.
    pub parameters: Value,
}

/// Turns one device on or off.
#[derive(Debug, Clone)]
pub struct SwitchTool {
    dispatcher: Dispatcher,
    state: LedState,
}

impl SwitchTool {
    /// The `turn_on_led` tool.
    #[must_use]
    pub fn on(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            state: LedState::On,
        }
    }

    /// The `turn_off_led` tool.
    #[must_use]
    pub fn off(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            state: LedState::Off,
        }
    }
}

impl Tool for SwitchTool {
    fn name(&self) -> &'static str {
        match self.state {
            LedState::On => "turn_on_led",
            LedState::Off => "turn_off_led",
        }
    }

    fn description(&self) -> String {
        format!(
            "Turn {} an LED by LED id ({}).",
            self.state.as_str().to_uppercase(),
            self.dispatcher.store().registry().describe_ids()
        )
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "led_number": {
                    "type": ["integer", "string"],
                    "description": "LED id"
                }
            },
            "required": ["led_number"]
        })
    }

    fn execute(&self, input: &Value) -> String {
        let device = match DeviceRef::from_input(input) {
            Ok(device) => device,
            Err(e) => {
                tracing::debug!(tool = self.name(), error = %e, "Rejected tool input");
                return self.dispatcher.rejection(input);
            }
        };
        match self.state {
            LedState::On => self.dispatcher.activate(&device),
            LedState::Off => self.dispatcher.deactivate(&device),
        }
    }
}

/// Reports the state of every device.
#[derive(Debug, Clone)]
pub struct StatusTool {
    dispatcher: Dispatcher,
}

impl StatusTool {
    /// The `get_led_status` tool.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl Tool for StatusTool {
    fn name(&self) -> &'static str {
        "get_led_status"
    }

    fn description(&self) -> String {
        format!(
            "Get current status of all LEDs ({}).",
            self.dispatcher.store().registry().describe_ids()
        )
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn execute(&self, _input: &Value) -> String {
        self.dispatcher.query_status()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::persistence::SnapshotFile;
    use crate::registry::DeviceRegistry;
    use crate::state::StateStore;

    fn dispatcher() -> (tempfile::TempDir, Dispatcher) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(
            DeviceRegistry::default(),
            SnapshotFile::new(dir.path().join("output.json")),
        );
        (dir, Dispatcher::new(Arc::new(store)))
    }

    #[test]
    fn switch_tool_names() {
        let (_dir, dispatcher) = dispatcher();
        assert_eq!(SwitchTool::on(dispatcher.clone()).name(), "turn_on_led");
        assert_eq!(SwitchTool::off(dispatcher).name(), "turn_off_led");
    }

    #[test]
    fn switch_tool_accepts_object_and_bare_input() {
        let (_dir, dispatcher) = dispatcher();
        let on = SwitchTool::on(dispatcher.clone());

        assert_eq!(on.execute(&json!({ "led_number": 2 })), "LED 2 turned on at GPIO 27.");
        assert_eq!(on.execute(&json!("4")), "LED 4 turned on at GPIO 23.");
        assert_eq!(
            dispatcher.store().snapshot().state("2"),
            Some(LedState::On)
        );
    }

    #[test]
    fn switch_tool_rejects_malformed_input() {
        let (_dir, dispatcher) = dispatcher();
        let off = SwitchTool::off(dispatcher.clone());
        let before = dispatcher.query_status();

        let reply = off.execute(&json!({ "colour": "red" }));

        assert!(reply.starts_with("Invalid LED id"));
        assert_eq!(dispatcher.query_status(), before);
    }

    #[test]
    fn status_tool_ignores_input() {
        let (_dir, dispatcher) = dispatcher();
        let status = StatusTool::new(dispatcher.clone());
        assert_eq!(status.execute(&json!({ "anything": true })), dispatcher.query_status());
    }

    #[test]
    fn spec_describes_tool() {
        let (_dir, dispatcher) = dispatcher();
        let spec = SwitchTool::on(dispatcher).spec();
        assert_eq!(spec.name, "turn_on_led");
        assert_eq!(spec.description, "Turn ON an LED by LED id (1, 2, 3, or 4).");
        assert_eq!(spec.parameters["required"], json!(["led_number"]));
    }
}
