// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ledstate` - durable LED state with a validated control surface.
//!
//! The crate keeps the authoritative on/off state of a fixed set of LEDs,
//! mirrors it to a JSON snapshot file after every change, and exposes three
//! operations to a command-driven caller: turn an LED on, turn it off, and
//! report the state of all LEDs.
//!
//! # Components
//!
//! - [`DeviceRegistry`]: the closed set of LED ids and their GPIO pins
//! - [`StateStore`](state::StateStore): in-memory state, one mutex, load and persist
//! - [`SnapshotFile`](persistence::SnapshotFile): atomic temp-file-and-rename writes
//! - [`Dispatcher`](dispatch::Dispatcher) and [`ToolRegistry`](dispatch::ToolRegistry):
//!   the operations, callable directly or by name
//! - [`Session`](session::Session): hands instructions to an [`Agent`](session::Agent)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ledstate::StoreConfig;
//! use ledstate::dispatch::Dispatcher;
//!
//! let store = Arc::new(StoreConfig::new("output.json").open());
//! let dispatcher = Dispatcher::new(store);
//!
//! println!("{}", dispatcher.activate(&"1".into()));
//! println!("{}", dispatcher.query_status());
//! ```
//!
//! # Failure Model
//!
//! Only unknown device ids are reported to callers, as text. A missing or
//! corrupt snapshot file falls back to all-off defaults, and a failed write
//! leaves the in-memory state authoritative until the next write succeeds.

mod config;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod persistence;
mod registry;
pub mod session;
pub mod state;
pub mod types;

pub use config::{DEFAULT_SNAPSHOT_PATH, StoreConfig};
pub use dispatch::{Dispatcher, Tool, ToolRegistry};
pub use driver::{NullDriver, PinDriver};
pub use error::{ConfigError, DriverError, Error, PersistError, Result, SnapshotError, ValueError};
pub use registry::{Device, DeviceRegistry, DeviceRegistryBuilder};
pub use session::{Agent, KeywordAgent, Session};
pub use state::{StateSnapshot, StateStore};
pub use types::{DeviceId, DeviceRef, GpioPin, LedState};
