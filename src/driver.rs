// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hardware actuation seam.
//!
//! The state store calls a [`PinDriver`] after every committed mutation.
//! Driver errors are logged and otherwise ignored: the recorded state never
//! depends on the hardware accepting the write.

use std::fmt;

use crate::error::DriverError;
use crate::types::GpioPin;

/// Drives a GPIO pin to a logic level.
pub trait PinDriver: Send + Sync + fmt::Debug {
    /// Sets `pin` high (`true`) or low (`false`).
    ///
    /// # Errors
    ///
    /// Returns `DriverError` if the write could not be performed.
    fn write(&self, pin: GpioPin, level: bool) -> Result<(), DriverError>;
}

/// A driver that only logs. Used when no hardware is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDriver;

impl PinDriver for NullDriver {
    fn write(&self, pin: GpioPin, level: bool) -> Result<(), DriverError> {
        tracing::trace!(pin = pin.number(), level, "GPIO write (no hardware attached)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_driver_accepts_everything() {
        let driver = NullDriver;
        assert!(driver.write(GpioPin::new(17), true).is_ok());
        assert!(driver.write(GpioPin::new(0), false).is_ok());
    }
}
