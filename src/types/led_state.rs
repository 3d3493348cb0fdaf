// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LED on/off state.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValueError;

/// The state of a single LED.
///
/// There is no transitional or unknown state: a device is always either on
/// or off. The serialized form is the lowercase literal used in the
/// snapshot file.
///
/// # Examples
///
/// ```
/// use ledstate::types::LedState;
///
/// assert_eq!(LedState::On.as_str(), "on");
/// assert_eq!("off".parse::<LedState>().unwrap(), LedState::Off);
/// assert!("OFF".parse::<LedState>().is_err());
/// assert!(LedState::On.level());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedState {
    /// LED is off.
    #[default]
    Off,
    /// LED is on.
    On,
}

impl LedState {
    /// Returns the snapshot string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns the logic level to drive the pin with.
    #[must_use]
    pub const fn level(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts exactly the snapshot literals `"on"` and `"off"`.
impl FromStr for LedState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            _ => Err(ValueError::InvalidLedState(s.to_string())),
        }
    }
}
