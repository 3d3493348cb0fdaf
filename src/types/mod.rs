// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the crate.
//!
//! - [`LedState`]: the two states a device can be in
//! - [`DeviceId`] / [`DeviceRef`]: canonical ids and the raw references callers send
//! - [`GpioPin`]: the physical address a device is wired to

mod device_id;
mod led_state;
mod pin;

pub use device_id::{DeviceId, DeviceRef};
pub use led_state::LedState;
pub use pin::GpioPin;
