//! Enumeration types for caregiving events.
//!
//! Each enum exposes its wire spelling through `as_str` and an
//! `ALL_NAMES` table so validators can report the allowed set.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// The discriminant of a caregiving event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// A diaper change at a single instant.
    Diaper,
    /// A nursing session with a start, an end, and a side.
    Nursing,
    /// A sleep period with a start and an end.
    Sleep,
}

impl EventKind {
    /// Every kind in declaration order.
    pub const ALL: [Self; 3] = [Self::Diaper, Self::Nursing, Self::Sleep];

    /// Wire spelling of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diaper => "diaper",
            Self::Nursing => "nursing",
            Self::Sleep => "sleep",
        }
    }

    /// Resolve a kind from its wire spelling, ignoring case and
    /// surrounding whitespace.
    pub fn from_name(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Nursing side
// ---------------------------------------------------------------------------

/// Which breast a nursing session used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NursingSide {
    /// Left side.
    Left,
    /// Right side.
    Right,
}

impl NursingSide {
    /// Accepted wire spellings.
    pub const ALL_NAMES: &'static [&'static str] = &["left", "right"];

    /// Wire spelling of the side.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Map a canonical (lowercase) spelling to a side.
    pub fn from_canonical(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Diaper contents
// ---------------------------------------------------------------------------

/// What a changed diaper contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DiaperContents {
    /// Urine only.
    Wet,
    /// Stool only.
    Dirty,
    /// Both.
    Mixed,
}

impl DiaperContents {
    /// Accepted wire spellings.
    pub const ALL_NAMES: &'static [&'static str] = &["wet", "dirty", "mixed"];

    /// Wire spelling of the contents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wet => "wet",
            Self::Dirty => "dirty",
            Self::Mixed => "mixed",
        }
    }

    /// Map a canonical (lowercase) spelling to a contents value.
    pub fn from_canonical(name: &str) -> Option<Self> {
        match name {
            "wet" => Some(Self::Wet),
            "dirty" => Some(Self::Dirty),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}
