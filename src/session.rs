// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instruction handling through a decision-making agent.
//!
//! An [`Agent`] turns a free-form instruction into zero or more tool calls
//! and a textual reply. [`Session`] supplies it with a fresh status snapshot
//! before every instruction and with the fixed [`ToolRegistry`].
//!
//! [`KeywordAgent`] is a small built-in agent that understands terse
//! commands such as `on 1`, `turn off 2 and 3` or `status`. A model-backed
//! agent can be plugged in through the same trait.

use serde_json::{Value, json};

use crate::dispatch::{Dispatcher, ToolRegistry};
use crate::error::Result;

/// Decides which tools to run for an instruction.
pub trait Agent {
    /// Handles one instruction.
    ///
    /// `context` describes the current device state and is refreshed for
    /// every call.
    ///
    /// # Errors
    ///
    /// Returns `Error::Agent` if no reply could be produced.
    fn respond(&mut self, instruction: &str, context: &str, tools: &ToolRegistry) -> Result<String>;
}

/// Runs instructions against an agent with a fresh state context each time.
#[derive(Debug)]
pub struct Session<A> {
    agent: A,
    dispatcher: Dispatcher,
    tools: ToolRegistry,
}

impl<A: Agent> Session<A> {
    /// Creates a session with the standard tool set.
    #[must_use]
    pub fn new(agent: A, dispatcher: Dispatcher) -> Self {
        let tools = ToolRegistry::for_dispatcher(&dispatcher);
        Self {
            agent,
            dispatcher,
            tools,
        }
    }

    /// Returns the tools offered to the agent.
    #[must_use]
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Returns the state context handed to the agent.
    #[must_use]
    pub fn context(&self) -> String {
        format!("Current LED memory state: {}", self.dispatcher.query_status())
    }

    /// Handles one instruction and returns the agent's reply.
    ///
    /// # Errors
    ///
    /// Propagates the agent's error.
    pub fn handle(&mut self, instruction: &str) -> Result<String> {
        let context = self.context();
        tracing::debug!(instruction, "Handling instruction");
        self.agent.respond(instruction, &context, &self.tools)
    }
}

const FILLER_WORDS: &[&str] = &[
    "turn", "switch", "set", "led", "leds", "light", "lights", "the", "and", "please", "number",
    "to", "lamp",
];

/// Understands terse on/off/status commands without a language model.
///
/// # Examples
///
/// | Instruction | Tool calls |
/// |-------------|------------|
/// | `on 1` | `turn_on_led(1)` |
/// | `turn off 2 and 3` | `turn_off_led(2)`, `turn_off_led(3)` |
/// | `all on` | `turn_on_led` for every id in the status |
/// | `status` | `get_led_status()` |
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordAgent;

impl KeywordAgent {
    /// Creates the agent.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn help() -> String {
        "I can turn LEDs on or off and report their status. Try 'on 1', 'off 2 3', 'all off' or 'status'."
            .to_string()
    }
}

impl Agent for KeywordAgent {
    fn respond(&mut self, instruction: &str, _context: &str, tools: &ToolRegistry) -> Result<String> {
        let lowered = instruction.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
            .filter(|word| !word.is_empty())
            .collect();

        let wants_on = words.contains(&"on");
        let wants_off = words.contains(&"off");
        let wants_status = words
            .iter()
            .any(|word| matches!(*word, "status" | "state" | "states"));

        let tool = match (wants_on, wants_off) {
            (true, false) => "turn_on_led",
            (false, true) => "turn_off_led",
            (true, true) => return Ok("Please ask for either on or off, not both.".to_string()),
            (false, false) if wants_status => return Ok(tools.call("get_led_status", &Value::Null)),
            (false, false) => return Ok(Self::help()),
        };

        let ids: Vec<String> = if words.contains(&"all") {
            let status: Value = serde_json::from_str(&tools.call("get_led_status", &Value::Null))
                .map_err(|e| crate::Error::Agent(format!("unreadable status: {e}")))?;
            status["leds"]
                .as_object()
                .map(|leds| leds.keys().cloned().collect())
                .unwrap_or_default()
        } else {
            words
                .iter()
                .filter(|word| {
                    !matches!(**word, "on" | "off" | "status" | "state" | "states")
                        && !FILLER_WORDS.contains(*word)
                })
                .map(|word| (*word).to_string())
                .collect()
        };

        if ids.is_empty() {
            return Ok("Which LED? Name one or more LED ids, or say 'all'.".to_string());
        }

        let replies: Vec<String> = ids
            .iter()
            .map(|id| tools.call(tool, &json!({ "led_number": id })))
            .collect();
        Ok(replies.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::persistence::SnapshotFile;
    use crate::registry::DeviceRegistry;
    use crate::state::StateStore;
    use crate::types::LedState;

    fn session() -> (tempfile::TempDir, Session<KeywordAgent>) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(
            DeviceRegistry::default(),
            SnapshotFile::new(dir.path().join("output.json")),
        );
        let dispatcher = Dispatcher::new(Arc::new(store));
        (dir, Session::new(KeywordAgent::new(), dispatcher))
    }

    #[derive(Debug, Default)]
    struct ContextRecorder {
        seen: Vec<String>,
    }

    impl Agent for ContextRecorder {
        fn respond(&mut self, instruction: &str, context: &str, tools: &ToolRegistry) -> Result<String> {
            self.seen.push(context.to_string());
            Ok(tools.call("turn_on_led", &json!(instruction)))
        }
    }

    #[test]
    fn single_device_commands() {
        let (_dir, mut session) = session();
        assert_eq!(session.handle("on 1").unwrap(), "LED 1 turned on at GPIO 17.");
        assert_eq!(
            session.handle("Please turn OFF led 1").unwrap(),
            "LED 1 turned off at GPIO 17."
        );
    }

    #[test]
    fn multiple_devices() {
        let (_dir, mut session) = session();
        let reply = session.handle("turn on 2 and 3").unwrap();
        assert_eq!(reply, "LED 2 turned on at GPIO 27.\nLED 3 turned on at GPIO 22.");
    }

    #[test]
    fn all_devices() {
        let (_dir, mut session) = session();
        let reply = session.handle("all on").unwrap();
        assert_eq!(reply.lines().count(), 4);
        assert!(session.context().contains(r#""4":"on""#));
    }

    #[test]
    fn unknown_device_reply() {
        let (_dir, mut session) = session();
        assert_eq!(
            session.handle("on 7").unwrap(),
            "Invalid LED id '7'. Use LED ids 1, 2, 3, or 4."
        );
    }

    #[test]
    fn status_and_help() {
        let (_dir, mut session) = session();
        assert!(session.handle("status?").unwrap().starts_with(r#"{"leds":"#));
        assert!(session.handle("hello").unwrap().starts_with("I can turn LEDs"));
        assert!(session.handle("on").unwrap().starts_with("Which LED?"));
        assert!(session.handle("on off 1").unwrap().contains("either on or off"));
    }

    #[test]
    fn agent_sees_fresh_context_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StateStore::new(
            DeviceRegistry::default(),
            SnapshotFile::new(dir.path().join("output.json")),
        ));
        let mut session = Session::new(ContextRecorder::default(), Dispatcher::new(Arc::clone(&store)));

        session.handle("1").unwrap();
        session.handle("2").unwrap();

        assert!(session.agent.seen[0].contains(r#""1":"off""#));
        assert!(session.agent.seen[1].contains(r#""1":"on""#));
        assert_eq!(store.snapshot().state("2"), Some(LedState::On));
    }
}
