//! Type-safe identifier wrappers around database `BIGSERIAL` keys.
//!
//! Babies and events each carry a strongly-typed ID so the two can never
//! be swapped at a call site. Identifiers are assigned by storage; the
//! constructors here exist for storage implementations and tests.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `i64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw identifier value.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Return the inner `i64` value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a tracked infant.
    BabyId
}

define_id! {
    /// Identifier of a stored caregiving event. Never reused.
    EventId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&BabyId::new(42)).unwrap_or_default();
        assert_eq!(json, "42");

        let back: EventId = serde_json::from_str("7").unwrap_or(EventId::new(0));
        assert_eq!(back.into_inner(), 7);
    }

    #[test]
    fn ids_order_numerically() {
        assert!(BabyId::new(2) < BabyId::new(10));
        assert_eq!(EventId::from(3_i64).to_string(), "3");
    }
}
