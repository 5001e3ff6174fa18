//! Per-variant validation of parsed event fields.
//!
//! The pipeline runs these stages in order, stopping at the first failure:
//! 1. Kind -- is the event kind supported?
//! 2. Required -- is every field the variant needs present?
//! 3. Forbidden -- is any field legal only for another variant present?
//! 4. Enums -- do `side` / `contents` name an allowed value?
//! 5. Ordering -- does the range end after it starts?
//! 6. Positivity -- is `duration_minutes` a whole number above zero?
//!
//! Success yields a [`ValidatedEvent`], the only input storage accepts.

use babytrack_types::{
    DiaperContents, DiaperDetails, EventKind, EventPayload, NursingDetails, NursingSide,
    SleepDetails,
};
use chrono::{DateTime, Utc};

use crate::parse::{Field, ParsedFields, RawEvent, parse_enum};

/// Reasons a structurally parsed request is semantically invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The requested kind is not one of `diaper`, `nursing`, `sleep`.
    #[error("unsupported event type {0:?}: type must be diaper, nursing, or sleep")]
    UnsupportedKind(String),

    /// A field the variant requires was absent.
    #[error("{field} is required for {kind} events")]
    MissingField {
        /// Missing field.
        field: &'static str,
        /// Variant being validated.
        kind: EventKind,
    },

    /// A field legal only for another variant was supplied.
    #[error("{field} is not allowed on {kind} events")]
    ForbiddenField {
        /// Offending field.
        field: &'static str,
        /// Variant being validated.
        kind: EventKind,
    },

    /// An enum field named a value outside its allowed set.
    #[error("{field} must be one of {allowed}, got {value:?}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// Value as received.
        value: String,
        /// Comma-separated allowed values.
        allowed: String,
    },

    /// The range end was not strictly after its start.
    #[error("ended_at must be after started_at for {kind} events")]
    EndNotAfterStart {
        /// Variant being validated.
        kind: EventKind,
    },

    /// A positive-integer field was zero or negative.
    #[error("{field} must be greater than 0")]
    NotPositive {
        /// Offending field.
        field: &'static str,
    },

    /// A positive-integer field exceeded its storage range.
    #[error("{field} is out of range")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending request field, if the error concerns one.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. }
            | Self::ForbiddenField { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::NotPositive { field }
            | Self::OutOfRange { field } => Some(*field),
            Self::EndNotAfterStart { .. } => Some(Field::EndedAt.name()),
            Self::UnsupportedKind(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Variant schemas
// ---------------------------------------------------------------------------

/// Which fields a variant requires and tolerates. Every other field in
/// [`Field::ALL`] is forbidden for it.
#[derive(Debug)]
struct VariantSchema {
    kind: EventKind,
    required: &'static [Field],
    optional: &'static [Field],
    /// Reject `ended_at == started_at` as well as inverted ranges.
    strict_ordering: bool,
}

impl VariantSchema {
    fn is_legal(&self, field: Field) -> bool {
        self.required.contains(&field) || self.optional.contains(&field)
    }
}

const DIAPER: VariantSchema = VariantSchema {
    kind: EventKind::Diaper,
    required: &[Field::OccurredAt],
    optional: &[Field::Contents, Field::Notes],
    strict_ordering: false,
};

const NURSING: VariantSchema = VariantSchema {
    kind: EventKind::Nursing,
    required: &[Field::StartedAt, Field::EndedAt, Field::Side],
    optional: &[Field::DurationMinutes],
    strict_ordering: true,
};

const SLEEP: VariantSchema = VariantSchema {
    kind: EventKind::Sleep,
    required: &[Field::StartedAt, Field::EndedAt],
    optional: &[],
    strict_ordering: true,
};

const fn schema_for(kind: EventKind) -> &'static VariantSchema {
    match kind {
        EventKind::Diaper => &DIAPER,
        EventKind::Nursing => &NURSING,
        EventKind::Sleep => &SLEEP,
    }
}

/// Names of the fields a kind accepts, required first.
pub fn legal_fields(kind: EventKind) -> impl Iterator<Item = Field> {
    let schema = schema_for(kind);
    schema.required.iter().chain(schema.optional).copied()
}

/// Whether `kind` accepts `field` at all.
pub fn is_legal(kind: EventKind, field: Field) -> bool {
    schema_for(kind).is_legal(field)
}

// ---------------------------------------------------------------------------
// Validated output
// ---------------------------------------------------------------------------

/// An event payload that passed every validation stage.
///
/// Only [`validate`] constructs this type, so holding one proves the
/// payload is well-formed for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    payload: EventPayload,
}

impl ValidatedEvent {
    /// The validated payload.
    pub const fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// The kind of the validated payload.
    pub const fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Consume the wrapper, returning the payload.
    pub fn into_payload(self) -> EventPayload {
        self.payload
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Resolve a requested kind. Unknown kinds end validation immediately.
pub fn resolve_kind(raw: &str) -> Result<EventKind, ValidationError> {
    EventKind::from_name(raw)
        .ok_or_else(|| ValidationError::UnsupportedKind(raw.trim().to_owned()))
}

/// Run the required and forbidden stages on a raw request, before any
/// value is parsed.
///
/// A forbidden field is reported as forbidden whatever it holds, so an
/// unparseable value in a field the kind never accepts cannot surface as
/// a parse error instead.
pub fn check_shape(kind: EventKind, raw: &RawEvent) -> Result<(), ValidationError> {
    let schema = schema_for(kind);
    let present = |field: Field| raw.present(field).is_some();
    check_required(schema, present)?;
    check_forbidden(schema, present)
}

/// Validate parsed fields against the schema of `kind`.
pub fn validate(kind: &str, fields: &ParsedFields) -> Result<ValidatedEvent, ValidationError> {
    let kind = resolve_kind(kind)?;
    let schema = schema_for(kind);

    check_required(schema, |field| fields.has(field))?;
    check_forbidden(schema, |field| fields.has(field))?;

    let payload = match kind {
        EventKind::Diaper => EventPayload::Diaper(build_diaper(fields)?),
        EventKind::Nursing => EventPayload::Nursing(build_nursing(schema, fields)?),
        EventKind::Sleep => EventPayload::Sleep(build_sleep(schema, fields)?),
    };

    Ok(ValidatedEvent { payload })
}

fn check_required(
    schema: &VariantSchema,
    present: impl Fn(Field) -> bool,
) -> Result<(), ValidationError> {
    match schema.required.iter().find(|field| !present(**field)) {
        Some(field) => Err(ValidationError::MissingField {
            field: field.name(),
            kind: schema.kind,
        }),
        None => Ok(()),
    }
}

fn check_forbidden(
    schema: &VariantSchema,
    present: impl Fn(Field) -> bool,
) -> Result<(), ValidationError> {
    match Field::ALL
        .into_iter()
        .find(|field| present(*field) && !schema.is_legal(*field))
    {
        Some(field) => Err(ValidationError::ForbiddenField {
            field: field.name(),
            kind: schema.kind,
        }),
        None => Ok(()),
    }
}

fn check_ordering(
    schema: &VariantSchema,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    let in_order = if schema.strict_ordering {
        ended_at > started_at
    } else {
        ended_at >= started_at
    };
    if in_order {
        Ok(())
    } else {
        Err(ValidationError::EndNotAfterStart { kind: schema.kind })
    }
}

/// Extract a field the required-stage already proved present.
fn require<T>(value: Option<T>, field: Field, kind: EventKind) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField {
        field: field.name(),
        kind,
    })
}

fn enum_value<T>(
    field: Field,
    raw: &str,
    allowed: &'static [&'static str],
    lookup: fn(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    parse_enum(field, raw, allowed)
        .ok()
        .and_then(lookup)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: field.name(),
            value: raw.to_owned(),
            allowed: allowed.join(", "),
        })
}

fn positive_u32(field: Field, value: i64) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive {
            field: field.name(),
        });
    }
    u32::try_from(value)
        .ok()
        .ok_or(ValidationError::OutOfRange {
            field: field.name(),
        })
}

fn build_diaper(fields: &ParsedFields) -> Result<DiaperDetails, ValidationError> {
    let occurred_at = require(fields.occurred_at, Field::OccurredAt, EventKind::Diaper)?;
    let contents = fields
        .contents
        .as_deref()
        .map(|raw| {
            enum_value(
                Field::Contents,
                raw,
                DiaperContents::ALL_NAMES,
                DiaperContents::from_canonical,
            )
        })
        .transpose()?;

    Ok(DiaperDetails {
        occurred_at,
        contents,
        notes: fields.notes.clone(),
    })
}

fn build_nursing(
    schema: &VariantSchema,
    fields: &ParsedFields,
) -> Result<NursingDetails, ValidationError> {
    let started_at = require(fields.started_at, Field::StartedAt, schema.kind)?;
    let ended_at = require(fields.ended_at, Field::EndedAt, schema.kind)?;
    let raw_side = require(fields.side.as_deref(), Field::Side, schema.kind)?;

    let side = enum_value(
        Field::Side,
        raw_side,
        NursingSide::ALL_NAMES,
        NursingSide::from_canonical,
    )?;
    check_ordering(schema, started_at, ended_at)?;
    let duration_minutes = fields
        .duration_minutes
        .map(|minutes| positive_u32(Field::DurationMinutes, minutes))
        .transpose()?;

    Ok(NursingDetails {
        started_at,
        ended_at,
        side,
        duration_minutes,
    })
}

fn build_sleep(
    schema: &VariantSchema,
    fields: &ParsedFields,
) -> Result<SleepDetails, ValidationError> {
    let started_at = require(fields.started_at, Field::StartedAt, schema.kind)?;
    let ended_at = require(fields.ended_at, Field::EndedAt, schema.kind)?;
    check_ordering(schema, started_at, ended_at)?;

    Ok(SleepDetails {
        started_at,
        ended_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 25, hour, minute, 0).unwrap()
    }

    fn nursing_fields() -> ParsedFields {
        ParsedFields {
            started_at: Some(at(10, 0)),
            ended_at: Some(at(10, 20)),
            side: Some("left".to_owned()),
            ..ParsedFields::default()
        }
    }

    fn sleep_fields() -> ParsedFields {
        ParsedFields {
            started_at: Some(at(12, 0)),
            ended_at: Some(at(13, 0)),
            ..ParsedFields::default()
        }
    }

    #[test]
    fn unknown_kind_is_terminal() {
        let err = validate("feeding", &sleep_fields()).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedKind("feeding".to_owned()));
        assert!(err.to_string().contains("unsupported event type"));
    }

    #[test]
    fn shape_is_judged_on_presence_alone() {
        let raw = RawEvent::new("sleep")
            .with(Field::StartedAt, "2026-02-25T13:00:00Z")
            .with(Field::EndedAt, "2026-02-25T14:00:00Z")
            .with(Field::DurationMinutes, 12.5);
        let err = check_shape(EventKind::Sleep, &raw).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ForbiddenField { field: "duration_minutes", .. }
        ));

        let raw = RawEvent::new("diaper").with(Field::OccurredAt, "garbage");
        assert!(check_shape(EventKind::Diaper, &raw).is_ok());
        assert!(matches!(
            resolve_kind(" Bath "),
            Err(ValidationError::UnsupportedKind(ref kind)) if kind == "Bath"
        ));
    }

    #[test]
    fn diaper_with_only_occurred_at_is_accepted() {
        let fields = ParsedFields {
            occurred_at: Some(at(10, 0)),
            ..ParsedFields::default()
        };
        let event = validate("diaper", &fields).unwrap();
        assert_eq!(
            event.payload(),
            &EventPayload::Diaper(DiaperDetails {
                occurred_at: at(10, 0),
                contents: None,
                notes: None,
            })
        );
    }

    #[test]
    fn diaper_keeps_contents_and_notes() {
        let fields = ParsedFields {
            occurred_at: Some(at(10, 0)),
            contents: Some("Dirty".to_owned()),
            notes: Some("blowout".to_owned()),
            ..ParsedFields::default()
        };
        let EventPayload::Diaper(details) = validate("diaper", &fields).unwrap().into_payload()
        else {
            panic!("expected a diaper payload");
        };
        assert_eq!(details.contents, Some(DiaperContents::Dirty));
        assert_eq!(details.notes.as_deref(), Some("blowout"));
    }

    #[test]
    fn missing_required_field_is_named() {
        let mut fields = nursing_fields();
        fields.ended_at = None;
        let err = validate("nursing", &fields).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "ended_at",
                kind: EventKind::Nursing
            }
        );
        assert_eq!(err.field(), Some("ended_at"));
    }

    #[test]
    fn side_is_forbidden_on_diaper_and_sleep() {
        let diaper = ParsedFields {
            occurred_at: Some(at(10, 0)),
            side: Some("left".to_owned()),
            ..ParsedFields::default()
        };
        assert!(matches!(
            validate("diaper", &diaper),
            Err(ValidationError::ForbiddenField { field: "side", .. })
        ));

        let mut sleep = sleep_fields();
        sleep.side = Some("right".to_owned());
        assert!(matches!(
            validate("sleep", &sleep),
            Err(ValidationError::ForbiddenField { field: "side", .. })
        ));
    }

    #[test]
    fn every_foreign_field_is_forbidden() {
        for kind in EventKind::ALL {
            let legal: Vec<Field> = legal_fields(kind).collect();
            for field in Field::ALL.into_iter().filter(|f| !legal.contains(f)) {
                let mut fields = match kind {
                    EventKind::Diaper => ParsedFields {
                        occurred_at: Some(at(10, 0)),
                        ..ParsedFields::default()
                    },
                    EventKind::Nursing => nursing_fields(),
                    EventKind::Sleep => sleep_fields(),
                };
                match field {
                    Field::OccurredAt => fields.occurred_at = Some(at(9, 0)),
                    Field::StartedAt => fields.started_at = Some(at(9, 0)),
                    Field::EndedAt => fields.ended_at = Some(at(9, 30)),
                    Field::Side => fields.side = Some("left".to_owned()),
                    Field::DurationMinutes => fields.duration_minutes = Some(10),
                    Field::Notes => fields.notes = Some("x".to_owned()),
                    Field::Contents => fields.contents = Some("wet".to_owned()),
                }
                let err = validate(kind.as_str(), &fields).unwrap_err();
                assert_eq!(
                    err,
                    ValidationError::ForbiddenField {
                        field: field.name(),
                        kind
                    },
                    "{field} on {kind}"
                );
            }
        }
    }

    #[test]
    fn nursing_side_must_be_left_or_right() {
        let mut fields = nursing_fields();
        fields.side = Some("RIGHT".to_owned());
        let EventPayload::Nursing(details) = validate("nursing", &fields).unwrap().into_payload()
        else {
            panic!("expected a nursing payload");
        };
        assert_eq!(details.side, NursingSide::Right);

        fields.side = Some("middle".to_owned());
        assert!(matches!(
            validate("nursing", &fields),
            Err(ValidationError::InvalidValue { field: "side", .. })
        ));
    }

    #[test]
    fn ranged_kinds_require_strict_ordering() {
        for (kind, base) in [("nursing", nursing_fields()), ("sleep", sleep_fields())] {
            let mut equal = base.clone();
            equal.ended_at = equal.started_at;
            assert!(
                matches!(
                    validate(kind, &equal),
                    Err(ValidationError::EndNotAfterStart { .. })
                ),
                "{kind}: equal timestamps must be rejected"
            );

            let mut inverted = base.clone();
            inverted.ended_at = Some(at(9, 0));
            assert!(
                matches!(
                    validate(kind, &inverted),
                    Err(ValidationError::EndNotAfterStart { .. })
                ),
                "{kind}: inverted range must be rejected"
            );

            assert!(validate(kind, &base).is_ok(), "{kind}: ordered range");
        }
    }

    #[test]
    fn duration_must_be_positive() {
        for minutes in [0, -5] {
            let mut fields = nursing_fields();
            fields.duration_minutes = Some(minutes);
            assert_eq!(
                validate("nursing", &fields),
                Err(ValidationError::NotPositive {
                    field: "duration_minutes"
                })
            );
        }

        let mut fields = nursing_fields();
        fields.duration_minutes = Some(i64::from(u32::MAX).saturating_add(1));
        assert!(matches!(
            validate("nursing", &fields),
            Err(ValidationError::OutOfRange { .. })
        ));

        fields.duration_minutes = Some(20);
        let EventPayload::Nursing(details) = validate("nursing", &fields).unwrap().into_payload()
        else {
            panic!("expected a nursing payload");
        };
        assert_eq!(details.duration_minutes, Some(20));
    }

    #[test]
    fn kind_is_case_insensitive() {
        let event = validate(" Sleep ", &sleep_fields()).unwrap();
        assert_eq!(event.kind(), EventKind::Sleep);
    }
}
