// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Name-to-handler mapping for tools.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use super::tool::{StatusTool, SwitchTool, Tool, ToolSpec};
use super::Dispatcher;

/// A request to run a tool, as produced by a collaborator.
///
/// ```
/// use ledstate::dispatch::ToolCall;
///
/// let call: ToolCall = serde_json::from_str(r#"{"name":"get_led_status"}"#).unwrap();
/// assert_eq!(call.name, "get_led_status");
/// assert!(call.arguments.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCall {
    /// Tool name.
    pub name: String,
    /// Tool input. Defaults to `null`.
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Creates a tool call.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// The fixed set of tools handed to a collaborator.
///
/// Built once at startup; lookups are by exact name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard registry: `turn_on_led`, `turn_off_led` and
    /// `get_led_status`.
    #[must_use]
    pub fn for_dispatcher(dispatcher: &Dispatcher) -> Self {
        let mut registry = Self::new();
        registry.register(SwitchTool::on(dispatcher.clone()));
        registry.register(SwitchTool::off(dispatcher.clone()));
        registry.register(StatusTool::new(dispatcher.clone()));
        registry
    }

    /// Adds a tool, replacing any tool with the same name.
    ///
    /// Returns `true` if a tool was replaced.
    pub fn register(&mut self, tool: impl Tool + 'static) -> bool {
        self.tools.insert(tool.name(), Box::new(tool)).is_some()
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| &**tool)
    }

    /// Returns the registered tool names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    /// Returns the advertised description of every tool.
    #[must_use]
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.spec()).collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Runs the tool named `name`.
    ///
    /// An unknown name yields a rejection string listing the known tools.
    #[must_use]
    pub fn call(&self, name: &str, input: &Value) -> String {
        match self.get(name) {
            Some(tool) => {
                tracing::debug!(tool = name, input = %input, "Executing tool");
                tool.execute(input)
            }
            None => {
                let known: Vec<&str> = self.names().collect();
                format!("Unknown tool '{name}'. Available tools: {}.", known.join(", "))
            }
        }
    }

    /// Runs a [`ToolCall`].
    #[must_use]
    pub fn invoke(&self, call: &ToolCall) -> String {
        self.call(&call.name, &call.arguments)
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
