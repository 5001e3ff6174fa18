//! Core entity structs: babies, event payloads, and stored events.
//!
//! [`EventPayload`] is the discriminated union of caregiving events. Each
//! variant carries only the fields legal for its kind, so a diaper event
//! cannot hold a `side` and a sleep event cannot hold an `occurred_at`.
//! On the wire the payload is internally tagged by `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DiaperContents, EventKind, NursingSide};
use crate::ids::{BabyId, EventId};

// ---------------------------------------------------------------------------
// Baby
// ---------------------------------------------------------------------------

/// A tracked infant. Created out-of-band and read-only to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Baby {
    /// Storage-assigned identifier.
    pub id: BabyId,
    /// Display name.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// Payload of a diaper change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DiaperDetails {
    /// When the change happened.
    pub occurred_at: DateTime<Utc>,
    /// What the diaper contained, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub contents: Option<DiaperContents>,
    /// Free-form caregiver note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub notes: Option<String>,
}

/// Payload of a nursing session. `ended_at` is strictly after `started_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NursingDetails {
    /// Session start.
    pub started_at: DateTime<Utc>,
    /// Session end.
    pub ended_at: DateTime<Utc>,
    /// Side used.
    pub side: NursingSide,
    /// Caregiver-reported duration, always positive when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub duration_minutes: Option<u32>,
}

/// Payload of a sleep period. `ended_at` is strictly after `started_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SleepDetails {
    /// Sleep start.
    pub started_at: DateTime<Utc>,
    /// Sleep end.
    pub ended_at: DateTime<Utc>,
}

/// A caregiving event payload, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventPayload {
    /// A diaper change.
    Diaper(DiaperDetails),
    /// A nursing session.
    Nursing(NursingDetails),
    /// A sleep period.
    Sleep(SleepDetails),
}

impl EventPayload {
    /// The kind discriminant of this payload.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Diaper(_) => EventKind::Diaper,
            Self::Nursing(_) => EventKind::Nursing,
            Self::Sleep(_) => EventKind::Sleep,
        }
    }

    /// The instant the event is filed under: the change time for diapers,
    /// the start for ranged events.
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Diaper(d) => d.occurred_at,
            Self::Nursing(n) => n.started_at,
            Self::Sleep(s) => s.started_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Stored events
// ---------------------------------------------------------------------------

/// An event after storage assigned it an identity.
///
/// Serializes flat: `{"id", "baby_id", "type", ...variant fields}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StoredEvent {
    /// Storage-assigned identifier.
    pub id: EventId,
    /// The baby this event belongs to.
    pub baby_id: BabyId,
    /// The validated variant payload.
    #[serde(flatten)]
    pub payload: EventPayload,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The caregiver profile served by `GET /v1/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Profile {
    /// Opaque user identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

impl Profile {
    /// The single mock profile; there is no authentication.
    pub fn mock() -> Self {
        Self {
            id: "usr_mock_1".to_owned(),
            name: "Baby Tracker User".to_owned(),
            email: "user@example.com".to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn stored_event_serializes_flat_with_type_tag() {
        let event = StoredEvent {
            id: EventId::new(5),
            baby_id: BabyId::new(1),
            payload: EventPayload::Sleep(SleepDetails {
                started_at: Utc.with_ymd_and_hms(2026, 2, 24, 12, 0, 0).unwrap(),
                ended_at: Utc.with_ymd_and_hms(2026, 2, 24, 13, 0, 0).unwrap(),
            }),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["baby_id"], 1);
        assert_eq!(json["type"], "sleep");
        assert_eq!(json["started_at"], "2026-02-24T12:00:00Z");
        assert!(json.get("side").is_none());
        assert!(json.get("occurred_at").is_none());
    }

    #[test]
    fn diaper_omits_absent_optionals() {
        let payload = EventPayload::Diaper(DiaperDetails {
            occurred_at: Utc.with_ymd_and_hms(2026, 2, 25, 10, 0, 0).unwrap(),
            contents: None,
            notes: None,
        });
        let json = serde_json::to_value(&payload).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(payload.kind(), EventKind::Diaper);
    }

    #[test]
    fn omitted_optionals_are_optional_in_bindings() {
        let diaper = DiaperDetails::decl();
        assert!(diaper.contains("contents?: DiaperContents"), "{diaper}");
        assert!(diaper.contains("notes?: string"), "{diaper}");

        let nursing = NursingDetails::decl();
        assert!(nursing.contains("duration_minutes?: number"), "{nursing}");
        assert!(!nursing.contains("null"), "{nursing}");
    }

    #[test]
    fn ranged_events_file_under_their_start() {
        let start = Utc.with_ymd_and_hms(2026, 2, 25, 10, 0, 0).unwrap();
        let payload = EventPayload::Nursing(NursingDetails {
            started_at: start,
            ended_at: Utc.with_ymd_and_hms(2026, 2, 25, 10, 20, 0).unwrap(),
            side: NursingSide::Left,
            duration_minutes: Some(20),
        });
        assert_eq!(payload.occurred_at(), start);
    }
}
