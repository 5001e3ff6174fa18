//! Wire-format parsing for event requests.
//!
//! Turns the loosely-typed JSON field bag of a `POST .../events` request
//! into typed primitives. Absence and malformation are kept apart: a key
//! that is missing, `null`, or blank is *absent* (the validator decides
//! whether that is allowed), while a key holding an unparseable value is
//! a [`ParseError`] naming the field.

use babytrack_types::BabyId;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Errors produced while converting raw wire values into typed values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A timestamp field did not hold an RFC 3339 timestamp.
    #[error("{field} must be an RFC 3339 timestamp, got {value:?}: {reason}")]
    InvalidTimestamp {
        /// Offending field.
        field: &'static str,
        /// The raw value as received.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A numeric field did not hold a whole number.
    #[error("{field} must be a whole number, got {value}")]
    NotWholeNumber {
        /// Offending field.
        field: &'static str,
        /// The raw value as received.
        value: String,
    },

    /// A text field held a non-string JSON value.
    #[error("{field} must be a string")]
    NotText {
        /// Offending field.
        field: &'static str,
    },

    /// A value was not a member of its allowed set.
    #[error("{field} must be one of {allowed}, got {value:?}")]
    NotInSet {
        /// Offending field.
        field: &'static str,
        /// The raw value as received.
        value: String,
        /// Comma-separated allowed values.
        allowed: String,
    },

    /// The baby identifier was not a positive integer.
    #[error("invalid baby id {value:?}: must be a positive integer")]
    InvalidBabyId {
        /// The raw identifier as received.
        value: String,
    },
}

impl ParseError {
    /// Name of the offending request field, if the error concerns one.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidTimestamp { field, .. }
            | Self::NotWholeNumber { field, .. }
            | Self::NotText { field }
            | Self::NotInSet { field, .. } => Some(*field),
            Self::InvalidBabyId { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Every variant-specific field an event request may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// `occurred_at`: instant of a point-in-time event.
    OccurredAt,
    /// `started_at`: start of a ranged event.
    StartedAt,
    /// `ended_at`: end of a ranged event.
    EndedAt,
    /// `side`: nursing side.
    Side,
    /// `duration_minutes`: reported nursing duration.
    DurationMinutes,
    /// `notes`: free text.
    Notes,
    /// `contents`: what a diaper contained.
    Contents,
}

impl Field {
    /// Every field in wire order.
    pub const ALL: [Self; 7] = [
        Self::OccurredAt,
        Self::StartedAt,
        Self::EndedAt,
        Self::Side,
        Self::DurationMinutes,
        Self::Notes,
        Self::Contents,
    ];

    /// Wire name of the field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::OccurredAt => "occurred_at",
            Self::StartedAt => "started_at",
            Self::EndedAt => "ended_at",
            Self::Side => "side",
            Self::DurationMinutes => "duration_minutes",
            Self::Notes => "notes",
            Self::Contents => "contents",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Raw request
// ---------------------------------------------------------------------------

/// The body of an event-creation request, exactly as decoded from JSON.
///
/// Values are kept as raw JSON so that "absent" and "present but wrong"
/// stay distinguishable. Unknown keys (including any client-supplied
/// `id`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEvent {
    /// Requested event kind.
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: String,
    /// Raw `occurred_at`.
    #[serde(default)]
    pub occurred_at: Option<Value>,
    /// Raw `started_at`.
    #[serde(default, alias = "start_at")]
    pub started_at: Option<Value>,
    /// Raw `ended_at`.
    #[serde(default, alias = "end_at")]
    pub ended_at: Option<Value>,
    /// Raw `side`.
    #[serde(default)]
    pub side: Option<Value>,
    /// Raw `duration_minutes`.
    #[serde(default)]
    pub duration_minutes: Option<Value>,
    /// Raw `notes`.
    #[serde(default)]
    pub notes: Option<Value>,
    /// Raw `contents`.
    #[serde(default)]
    pub contents: Option<Value>,
}

impl RawEvent {
    /// Start an empty request of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set a field to a raw value.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    /// The raw value of a field, if the key was supplied at all.
    pub const fn get(&self, field: Field) -> Option<&Value> {
        match field {
            Field::OccurredAt => self.occurred_at.as_ref(),
            Field::StartedAt => self.started_at.as_ref(),
            Field::EndedAt => self.ended_at.as_ref(),
            Field::Side => self.side.as_ref(),
            Field::DurationMinutes => self.duration_minutes.as_ref(),
            Field::Notes => self.notes.as_ref(),
            Field::Contents => self.contents.as_ref(),
        }
    }

    const fn slot_mut(&mut self, field: Field) -> &mut Option<Value> {
        match field {
            Field::OccurredAt => &mut self.occurred_at,
            Field::StartedAt => &mut self.started_at,
            Field::EndedAt => &mut self.ended_at,
            Field::Side => &mut self.side,
            Field::DurationMinutes => &mut self.duration_minutes,
            Field::Notes => &mut self.notes,
            Field::Contents => &mut self.contents,
        }
    }

    /// The raw value of a field if it counts as present: not missing,
    /// not `null`, and not a blank string.
    pub fn present(&self, field: Field) -> Option<&Value> {
        match self.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Primitive parsers
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 timestamp (fractional seconds optional, any offset)
/// and normalise it to UTC.
///
/// Only `T` (or `t`) separates date and time; chrono alone would also
/// take a space.
pub fn parse_timestamp(field: Field, raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ParseError::InvalidTimestamp {
        field: field.name(),
        value: trimmed.to_owned(),
        reason,
    };

    if !matches!(trimmed.as_bytes().get(10), Some(b'T' | b't')) {
        return Err(invalid("date and time must be separated by 'T'".to_owned()));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| invalid(e.to_string()))
}

/// Match `raw` case-insensitively against `allowed`, returning the
/// canonical spelling.
pub fn parse_enum(
    field: Field,
    raw: &str,
    allowed: &'static [&'static str],
) -> Result<&'static str, ParseError> {
    let needle = raw.trim();
    allowed
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(needle))
        .ok_or_else(|| ParseError::NotInSet {
            field: field.name(),
            value: needle.to_owned(),
            allowed: allowed.join(", "),
        })
}

/// Parse a whole number from a JSON integer or a decimal integer string.
///
/// Floats are rejected even when integral (`12.0`); no rounding happens.
pub fn parse_whole_number(field: Field, raw: &Value) -> Result<i64, ParseError> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ParseError::NotWholeNumber {
        field: field.name(),
        value: raw.to_string(),
    })
}

/// Parse a path-supplied baby identifier. Must be a positive integer.
pub fn parse_baby_id(raw: &str) -> Result<BabyId, ParseError> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(id) if id > 0 => Ok(BabyId::new(id)),
        _ => Err(ParseError::InvalidBabyId {
            value: trimmed.to_owned(),
        }),
    }
}

fn parse_text(field: Field, raw: &Value) -> Result<String, ParseError> {
    match raw {
        Value::String(s) => Ok(s.trim().to_owned()),
        _ => Err(ParseError::NotText {
            field: field.name(),
        }),
    }
}

fn optional_timestamp(raw: &RawEvent, field: Field) -> Result<Option<DateTime<Utc>>, ParseError> {
    raw.present(field)
        .map(|value| parse_text(field, value).and_then(|text| parse_timestamp(field, &text)))
        .transpose()
}

fn optional_text(raw: &RawEvent, field: Field) -> Result<Option<String>, ParseError> {
    raw.present(field)
        .map(|value| parse_text(field, value))
        .transpose()
}

// ---------------------------------------------------------------------------
// Parsed fields
// ---------------------------------------------------------------------------

/// A request's fields after primitive parsing, before variant validation.
///
/// Every member is `None` when the field was absent. Enum membership and
/// sign checks are left to the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    /// Parsed `occurred_at`.
    pub occurred_at: Option<DateTime<Utc>>,
    /// Parsed `started_at`.
    pub started_at: Option<DateTime<Utc>>,
    /// Parsed `ended_at`.
    pub ended_at: Option<DateTime<Utc>>,
    /// Trimmed `side` text.
    pub side: Option<String>,
    /// Parsed `duration_minutes`.
    pub duration_minutes: Option<i64>,
    /// Trimmed `notes` text.
    pub notes: Option<String>,
    /// Trimmed `contents` text.
    pub contents: Option<String>,
}

impl ParsedFields {
    /// Parse every field of a raw request.
    pub fn parse(raw: &RawEvent) -> Result<Self, ParseError> {
        Self::parse_only(raw, |_| true)
    }

    /// Parse the fields `wanted` selects; the rest are left `None`
    /// without looking at their values.
    pub fn parse_only(raw: &RawEvent, wanted: impl Fn(Field) -> bool) -> Result<Self, ParseError> {
        let timestamp = |field| {
            if wanted(field) {
                optional_timestamp(raw, field)
            } else {
                Ok(None)
            }
        };
        let text = |field| {
            if wanted(field) {
                optional_text(raw, field)
            } else {
                Ok(None)
            }
        };
        let duration_minutes = if wanted(Field::DurationMinutes) {
            raw.present(Field::DurationMinutes)
                .map(|value| parse_whole_number(Field::DurationMinutes, value))
                .transpose()?
        } else {
            None
        };

        Ok(Self {
            occurred_at: timestamp(Field::OccurredAt)?,
            started_at: timestamp(Field::StartedAt)?,
            ended_at: timestamp(Field::EndedAt)?,
            side: text(Field::Side)?,
            duration_minutes,
            notes: text(Field::Notes)?,
            contents: text(Field::Contents)?,
        })
    }

    /// Whether a field was present in the request.
    pub const fn has(&self, field: Field) -> bool {
        match field {
            Field::OccurredAt => self.occurred_at.is_some(),
            Field::StartedAt => self.started_at.is_some(),
            Field::EndedAt => self.ended_at.is_some(),
            Field::Side => self.side.is_some(),
            Field::DurationMinutes => self.duration_minutes.is_some(),
            Field::Notes => self.notes.is_some(),
            Field::Contents => self.contents.is_some(),
        }
    }
}
