//! Closed enum types for the document lifecycle engine.
//!
//! Unlike the teacher's federation-oriented enums (which accept arbitrary
//! custom string variants), these are closed: an unrecognised string is a
//! parse error, not a silently-accepted custom variant. Engineering
//! documentation has a fixed, known vocabulary of document types, states, and
//! relationship kinds.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unrecognised enum string.
#[derive(Debug, thiserror::Error)]
#[error("invalid {kind}: {value:?} (valid values: {valid})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    valid: &'static str,
}

macro_rules! define_closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, kind = $kind:expr, default = $default:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// All valid variants, in declaration order.
            pub const ALL: &'static [$name] = &[ $( Self::$variant, )+ ];

            /// Returns the canonical string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $str => Ok(Self::$variant), )+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_owned(),
                        valid: concat!($( $str, ", " ),+),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_str(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_closed_enum! {
    /// The kind of engineering document being tracked.
    DocumentType, kind = "document type", default = Prd,
    variants: [
        (Prd, "prd"),
        (Architecture, "architecture"),
        (Epic, "epic"),
        (Story, "story"),
        (Adr, "adr"),
        (Postmortem, "postmortem"),
        (Runbook, "runbook"),
        (QaReport, "qa_report"),
        (TestReport, "test_report"),
    ]
}

define_closed_enum! {
    /// Lifecycle state of a document.
    DocumentState, kind = "document state", default = Draft,
    variants: [
        (Draft, "draft"),
        (Active, "active"),
        (Obsolete, "obsolete"),
        (Archived, "archived"),
    ]
}

impl DocumentState {
    /// States a document may transition to from this state.
    ///
    /// Mirrors the reference state machine's `TRANSITIONS` table exactly.
    pub fn allowed_next_states(&self) -> &'static [DocumentState] {
        match self {
            DocumentState::Draft => &[DocumentState::Active, DocumentState::Archived],
            DocumentState::Active => &[DocumentState::Obsolete, DocumentState::Archived],
            DocumentState::Obsolete => &[DocumentState::Archived],
            DocumentState::Archived => &[],
        }
    }

    /// Returns `true` if no further transitions are possible from this state.
    pub fn is_terminal(&self) -> bool {
        self.allowed_next_states().is_empty()
    }
}

define_closed_enum! {
    /// The kind of relationship between two documents.
    RelationshipType, kind = "relationship type", default = References,
    variants: [
        (DerivedFrom, "derived_from"),
        (Implements, "implements"),
        (Tests, "tests"),
        (Replaces, "replaces"),
        (References, "references"),
    ]
}
