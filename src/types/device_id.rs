// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier types.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::ValueError;

/// Canonical identifier of a logical device, e.g. `"1"`.
///
/// The id is always trimmed. Whether it names a known device is decided by
/// the [`DeviceRegistry`](crate::DeviceRegistry), not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device id from text, trimming surrounding whitespace.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A device reference as supplied by a caller.
///
/// Callers may name a device by number (`1`) or by text (`"1"`, `" 1 "`).
/// Both normalize to the same [`DeviceId`].
///
/// # Examples
///
/// ```
/// use ledstate::types::{DeviceId, DeviceRef};
///
/// assert_eq!(DeviceRef::from(3_u32).normalize(), DeviceId::new("3"));
/// assert_eq!(DeviceRef::from(" 3 ").normalize(), DeviceId::new("3"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceRef {
    /// Numeric reference.
    Number(serde_json::Number),
    /// Textual reference.
    Text(String),
}

impl DeviceRef {
    /// Argument names accepted when the reference is wrapped in an object.
    pub const ARGUMENT_KEYS: [&'static str; 3] = ["led_number", "id", "device"];

    /// Normalizes the reference to its canonical string form.
    #[must_use]
    pub fn normalize(&self) -> DeviceId {
        match self {
            Self::Number(n) => DeviceId::new(n.to_string()),
            Self::Text(s) => DeviceId::new(s),
        }
    }

    /// Extracts a reference from tool input.
    ///
    /// Accepts a bare number or string, or an object carrying one of
    /// [`ARGUMENT_KEYS`](Self::ARGUMENT_KEYS).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidDeviceRef` for any other shape.
    pub fn from_input(input: &Value) -> Result<Self, ValueError> {
        match input {
            Value::Number(n) => Ok(Self::Number(n.clone())),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Object(map) => Self::ARGUMENT_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .filter(|value| !value.is_object())
                .map_or_else(
                    || Err(ValueError::InvalidDeviceRef(input.to_string())),
                    Self::from_input,
                ),
            _ => Err(ValueError::InvalidDeviceRef(input.to_string())),
        }
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for DeviceRef {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for DeviceRef {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn device_id_is_trimmed() {
        assert_eq!(DeviceId::new("  2\n").as_str(), "2");
        assert!(DeviceId::new("   ").is_blank());
    }

    #[test]
    fn number_and_text_normalize_alike() {
        assert_eq!(DeviceRef::from(4_u32).normalize(), DeviceRef::from("4").normalize());
        assert_eq!(DeviceRef::from_input(&json!(-1)).unwrap().normalize().as_str(), "-1");
    }

    #[test]
    fn from_input_bare_values() {
        assert_eq!(DeviceRef::from_input(&json!(2)).unwrap().normalize().as_str(), "2");
        assert_eq!(
            DeviceRef::from_input(&json!(" 2")).unwrap().normalize().as_str(),
            "2"
        );
    }

    #[test]
    fn from_input_object_keys() {
        let input = json!({ "led_number": 3 });
        assert_eq!(DeviceRef::from_input(&input).unwrap().normalize().as_str(), "3");

        let input = json!({ "device": "4" });
        assert_eq!(DeviceRef::from_input(&input).unwrap().normalize().as_str(), "4");
    }

    #[test]
    fn from_input_rejects_other_shapes() {
        assert!(DeviceRef::from_input(&json!(null)).is_err());
        assert!(DeviceRef::from_input(&json!([1])).is_err());
        assert!(DeviceRef::from_input(&json!(true)).is_err());
        assert!(DeviceRef::from_input(&json!({ "led": 1 })).is_err());
        assert!(DeviceRef::from_input(&json!({ "id": { "id": 1 } })).is_err());
    }

    #[test]
    fn float_reference_is_not_an_integer_id() {
        let reference = DeviceRef::from_input(&json!(1.5)).unwrap();
        assert_eq!(reference.normalize().as_str(), "1.5");
    }
}
