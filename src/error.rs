//! Row parse-failure taxonomy.

use thiserror::Error;

use crate::kind::EventKind;

/// Why a row could not be turned into a record.
///
/// Parsing is all-or-nothing and side-effect free; every variant carries the
/// offending text so callers can decide whether to abort, skip or log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The row does not have exactly six fields.
    #[error("row has {found} fields, expected 6")]
    MalformedRow { found: usize },

    /// Field 1 names a kind other than the one this record type owns.
    #[error("expected event kind {expected} ({expected:?}), row is tagged {actual:?}")]
    WrongEventKind { expected: EventKind, actual: String },

    /// Field 0 is not a non-negative fractional seconds count.
    #[error("time field has invalid value {value:?}")]
    InvalidTimeField { value: String },

    /// An integer field failed to parse for its column type, or parsed to a
    /// value outside the column's range.
    #[error("{field} field has invalid value {value:?}")]
    InvalidNumericField { field: &'static str, value: String },

    /// A sentinel column holds something other than its fixed value.
    #[error("{field} field must be {expected} for this event kind, found {actual:?}")]
    InvalidFixedField {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// Field 1 is not one of the seven known kind codes. Only kind-dispatched
    /// parsing reports this; per-type parsing reports `WrongEventKind`.
    #[error("unrecognized event kind code {code:?}")]
    UnknownEventKind { code: String },
}
