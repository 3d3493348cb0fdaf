// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device state aggregate.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::persistence::RawSnapshot;
use crate::registry::DeviceRegistry;
use crate::types::{DeviceId, LedState};

/// State of every registered device plus the time of the last mutation.
///
/// The key set of `leds` is always exactly the registry's id set. A
/// snapshot returned by [`StateStore::snapshot`](super::StateStore::snapshot)
/// is an owned copy; later mutations never affect it.
///
/// The serialized form is the snapshot file schema:
///
/// ```json
/// {"leds":{"1":"on","2":"off","3":"off","4":"off"},"updated_at":"2024-01-01T00:00:00+00:00"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    leds: BTreeMap<DeviceId, LedState>,
    #[serde(serialize_with = "serialize_timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

impl StateSnapshot {
    /// All devices off, no timestamp.
    #[must_use]
    pub fn defaults(registry: &DeviceRegistry) -> Self {
        Self {
            leds: registry.ids().map(|id| (id.clone(), LedState::Off)).collect(),
            updated_at: None,
        }
    }

    /// Returns the state of `id`, or `None` if it is not registered.
    #[must_use]
    pub fn state(&self, id: &str) -> Option<LedState> {
        self.leds.get(id).copied()
    }

    /// Returns all device states keyed by id.
    #[must_use]
    pub fn leds(&self) -> &BTreeMap<DeviceId, LedState> {
        &self.leds
    }

    /// Returns the time of the last mutation.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Renders the compact wire form returned by the status query.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Sets `id` to `state` and stamps the change with `now`.
    ///
    /// The timestamp never moves backward: if `now` is earlier than the
    /// current stamp, the current stamp is kept. Returns `false` without
    /// touching anything if `id` is not a key of this snapshot.
    pub(crate) fn set(&mut self, id: &DeviceId, state: LedState, now: DateTime<Utc>) -> bool {
        let Some(slot) = self.leds.get_mut(id.as_str()) else {
            return false;
        };
        *slot = state;
        self.updated_at = Some(self.updated_at.map_or(now, |prev| prev.max(now)));
        true
    }

    /// Merges the recognizable parts of a persisted snapshot.
    ///
    /// Unknown ids and values other than `"on"` / `"off"` are dropped. The
    /// timestamp is replaced wholesale: a missing, non-string or unparsable
    /// timestamp becomes `None`. A timestamp needs an explicit offset; it is
    /// converted to UTC, so a `Z` or `+02:00` stamp is written back as
    /// `+00:00`. Returns the number of dropped entries.
    pub(crate) fn overlay(&mut self, raw: RawSnapshot) -> usize {
        let mut dropped = 0;
        for (id, value) in raw.leds {
            let id = DeviceId::new(id);
            let state = value.as_str().and_then(|s| s.parse::<LedState>().ok());
            match (self.leds.get_mut(id.as_str()), state) {
                (Some(slot), Some(state)) => *slot = state,
                _ => {
                    tracing::debug!(device = %id, "Ignoring unrecognized snapshot entry");
                    dropped += 1;
                }
            }
        }
        self.updated_at = raw
            .updated_at
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| ts.with_timezone(&Utc));
        dropped
    }
}

#[allow(clippy::ref_option)]
fn serialize_timestamp<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn raw(value: serde_json::Value) -> RawSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn defaults_cover_registry() {
        let snapshot = StateSnapshot::defaults(&DeviceRegistry::default());
        assert_eq!(snapshot.leds().len(), 4);
        assert!(snapshot.leds().values().all(|s| *s == LedState::Off));
        assert_eq!(snapshot.updated_at(), None);
        assert_eq!(
            snapshot.to_json(),
            r#"{"leds":{"1":"off","2":"off","3":"off","4":"off"},"updated_at":null}"#
        );
    }

    #[test]
    fn set_unknown_id_is_ignored() {
        let mut snapshot = StateSnapshot::defaults(&DeviceRegistry::default());
        let before = snapshot.clone();
        assert!(!snapshot.set(&DeviceId::new("7"), LedState::On, Utc::now()));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn timestamp_never_moves_backward() {
        let mut snapshot = StateSnapshot::defaults(&DeviceRegistry::default());
        let later = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap();

        snapshot.set(&DeviceId::new("1"), LedState::On, later);
        snapshot.set(&DeviceId::new("2"), LedState::On, earlier);

        assert_eq!(snapshot.updated_at(), Some(later));
        assert_eq!(snapshot.state("2"), Some(LedState::On));
    }

    #[test]
    fn timestamp_uses_offset_form() {
        let mut snapshot = StateSnapshot::defaults(&DeviceRegistry::default());
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        snapshot.set(&DeviceId::new("1"), LedState::On, ts);
        assert!(snapshot.to_json().ends_with(r#""updated_at":"2024-01-01T00:00:00+00:00"}"#));
    }

    #[test]
    fn overlay_keeps_known_valid_entries() {
        let mut snapshot = StateSnapshot::defaults(&DeviceRegistry::default());
        let dropped = snapshot.overlay(raw(json!({
            "leds": { "1": "on", "3": "blinking", "9": "on", "4": 1 },
            "updated_at": "2024-01-01T00:00:00+00:00"
        })));

        assert_eq!(dropped, 3);
        assert_eq!(snapshot.state("1"), Some(LedState::On));
        assert_eq!(snapshot.state("3"), Some(LedState::Off));
        assert_eq!(snapshot.state("4"), Some(LedState::Off));
        assert_eq!(snapshot.state("9"), None);
        assert_eq!(
            snapshot.updated_at(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn overlay_normalizes_timestamps_to_utc() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut snapshot = StateSnapshot::defaults(&DeviceRegistry::default());

        snapshot.overlay(raw(json!({ "leds": {}, "updated_at": "2024-01-01T00:00:00Z" })));
        assert_eq!(snapshot.updated_at(), Some(utc));
        assert!(snapshot.to_json().ends_with(r#""updated_at":"2024-01-01T00:00:00+00:00"}"#));

        snapshot.overlay(raw(json!({ "leds": {}, "updated_at": "2024-01-01T02:00:00+02:00" })));
        assert_eq!(snapshot.updated_at(), Some(utc));
        assert!(snapshot.to_json().ends_with(r#""updated_at":"2024-01-01T00:00:00+00:00"}"#));

        snapshot.overlay(raw(json!({ "leds": {}, "updated_at": "2024-01-01T00:00:00" })));
        assert_eq!(snapshot.updated_at(), None);
    }

    #[test]
    fn overlay_non_string_timestamp_becomes_none() {
        let mut snapshot = StateSnapshot::defaults(&DeviceRegistry::default());
        snapshot.set(&DeviceId::new("1"), LedState::On, Utc::now());

        snapshot.overlay(raw(json!({ "leds": {}, "updated_at": 12 })));
        assert_eq!(snapshot.updated_at(), None);

        snapshot.overlay(raw(json!({ "leds": {}, "updated_at": "yesterday" })));
        assert_eq!(snapshot.updated_at(), None);

        snapshot.overlay(raw(json!({ "leds": {} })));
        assert_eq!(snapshot.updated_at(), None);
    }
}
