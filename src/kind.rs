//! Code enumerations shared by every row: the event kind tag carried in
//! field 1 and the halt reason carried in the price column of kind-7 rows.
//!
//! Both enums own their wire codes through `code`/`from_code` pairs; the
//! `Display` and serde impls delegate to those so the textual, CSV and JSON
//! forms can never drift apart.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// The seven LOBSTER event categories, tagged in row field 1 by the decimal
/// digits `"1"` through `"7"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A new limit order entering the book.
    Submission,
    /// Partial cancellation of a resting limit order.
    Cancellation,
    /// Total deletion of a resting limit order.
    Deletion,
    /// Execution against a visible limit order.
    ExecutionVisible,
    /// Execution against a hidden limit order.
    ExecutionHidden,
    /// Auction (cross) trade.
    CrossTrade,
    /// Trading halt indicator.
    TradingHalt,
}

impl EventKind {
    /// Every kind, in code order.
    pub const ALL: [Self; 7] = [
        Self::Submission,
        Self::Cancellation,
        Self::Deletion,
        Self::ExecutionVisible,
        Self::ExecutionHidden,
        Self::CrossTrade,
        Self::TradingHalt,
    ];

    /// Canonical one-character code, as written in row field 1 and in the
    /// JSON `eventtype` tag.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Submission => "1",
            Self::Cancellation => "2",
            Self::Deletion => "3",
            Self::ExecutionVisible => "4",
            Self::ExecutionHidden => "5",
            Self::CrossTrade => "6",
            Self::TradingHalt => "7",
        }
    }

    /// Inverse of [`code`](Self::code). Anything but the seven exact code
    /// strings maps to `None`; there is no trimming or normalization.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Submission),
            "2" => Some(Self::Cancellation),
            "3" => Some(Self::Deletion),
            "4" => Some(Self::ExecutionVisible),
            "5" => Some(Self::ExecutionHidden),
            "6" => Some(Self::CrossTrade),
            "7" => Some(Self::TradingHalt),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Self::from_code(&code).ok_or_else(|| {
            de::Error::invalid_value(
                de::Unexpected::Str(&code),
                &"an event kind code between \"1\" and \"7\"",
            )
        })
    }
}

/// Sub-classification of a kind-7 row, carried where other kinds put the
/// price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaltReason {
    /// Trading stops.
    HaltTrading,
    /// Quoting resumes while trading is still halted.
    ResumeQuoting,
    /// Trading resumes.
    ResumeTrading,
}

impl HaltReason {
    /// Canonical integer code, as written in the price column and in the
    /// JSON `halttype` field.
    pub const fn code(self) -> i64 {
        match self {
            Self::HaltTrading => -1,
            Self::ResumeQuoting => 0,
            Self::ResumeTrading => 1,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::HaltTrading),
            0 => Some(Self::ResumeQuoting),
            1 => Some(Self::ResumeTrading),
            _ => None,
        }
    }
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for HaltReason {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for HaltReason {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        Self::from_code(code).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Signed(code), &"-1, 0 or 1")
        })
    }
}
