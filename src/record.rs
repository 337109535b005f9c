//! LOBSTER event records and their row mapping.
//!
//! One struct per event kind, each carrying only the fields that kind
//! actually uses. Sentinel-only columns exist in row text but not in the
//! structs; formatting writes them back. [`LobsterRecord`] is the per-type
//! parse/format contract and [`LobsterEvent`] the kind-dispatched sum of
//! all seven.
//!
//! Row layout, shared by every kind:
//! `[time_since_midnight, event_kind, order_id, size, price, direction]`,
//! with the price column reinterpreted as a halt reason on kind-7 rows.

use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ParseError;
use crate::kind::{EventKind, HaltReason};

/// Number of fields in one LOBSTER row.
pub const ROW_WIDTH: usize = 6;

/// Parse/format contract shared by the seven record types.
pub trait LobsterRecord: Sized {
    /// The kind code this record type owns. `from_row` accepts rows tagged
    /// with exactly this code; anything else is rejected before the
    /// remaining fields are read.
    const KIND: EventKind;

    /// Parse one pre-split row of exactly [`ROW_WIDTH`] text fields.
    /// Fails without partial effects.
    fn from_row<S: AsRef<str>>(row: &[S]) -> Result<Self, ParseError>;

    /// Canonical row form. Total: every constructed record has one, with
    /// times rendered as fixed six-decimal seconds.
    fn to_row(&self) -> [String; ROW_WIDTH];
}

/// A new limit order entering the book (kind 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(rename = "timesincemidnight", with = "duration_nanos")]
    pub time_since_midnight: Duration,
    #[serde(rename = "orderid")]
    pub order_id: u64,
    pub size: u64,
    pub price: u64,
    #[serde(rename = "side")]
    pub direction: i64,
}

/// Partial cancellation of a resting limit order (kind 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    #[serde(rename = "timesincemidnight", with = "duration_nanos")]
    pub time_since_midnight: Duration,
    #[serde(rename = "orderid")]
    pub order_id: u64,
    pub size: u64,
    pub price: u64,
    #[serde(rename = "side")]
    pub direction: i64,
}

/// Total deletion of a resting limit order (kind 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    #[serde(rename = "timesincemidnight", with = "duration_nanos")]
    pub time_since_midnight: Duration,
    #[serde(rename = "orderid")]
    pub order_id: u64,
    pub size: u64,
    pub price: u64,
    #[serde(rename = "side")]
    pub direction: i64,
}

/// Execution against a visible limit order (kind 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionVisible {
    #[serde(rename = "timesincemidnight", with = "duration_nanos")]
    pub time_since_midnight: Duration,
    #[serde(rename = "orderid")]
    pub order_id: u64,
    pub size: u64,
    pub price: u64,
    #[serde(rename = "side")]
    pub direction: i64,
}

/// Execution against a hidden limit order (kind 5). Hidden orders have no
/// public id, so the order id column is a sentinel `0` in row form and
/// absent here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionHidden {
    #[serde(rename = "timesincemidnight", with = "duration_nanos")]
    pub time_since_midnight: Duration,
    pub size: u64,
    pub price: u64,
    #[serde(rename = "side")]
    pub direction: i64,
}

/// Auction (cross) trade (kind 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTrade {
    #[serde(rename = "timesincemidnight", with = "duration_nanos")]
    pub time_since_midnight: Duration,
    #[serde(rename = "orderid")]
    pub order_id: u64,
    pub size: u64,
    pub price: u64,
    #[serde(rename = "side")]
    pub direction: i64,
}

/// Trading halt indicator (kind 7). Only the halt reason varies; the order
/// columns are fixed sentinels (`0`, `0`, `-1`) in row form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingHalt {
    #[serde(rename = "timesincemidnight", with = "duration_nanos")]
    pub time_since_midnight: Duration,
    #[serde(rename = "halttype")]
    pub halt_type: HaltReason,
}

/// Record wrapped with its kind code, the JSON form cancellations and
/// executions use: `{"event": {...}, "eventtype": "<code>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagged<T> {
    pub event: T,
    pub eventtype: EventKind,
}

impl Cancellation {
    /// Tagged JSON form of this record.
    pub fn tagged(&self) -> Tagged<&Self> {
        Tagged { event: self, eventtype: Self::KIND }
    }
}

impl ExecutionVisible {
    /// Tagged JSON form of this record.
    pub fn tagged(&self) -> Tagged<&Self> {
        Tagged { event: self, eventtype: Self::KIND }
    }
}

impl ExecutionHidden {
    /// Tagged JSON form of this record.
    pub fn tagged(&self) -> Tagged<&Self> {
        Tagged { event: self, eventtype: Self::KIND }
    }
}

/// Parse/format for the five kinds that keep the full field set.
macro_rules! impl_full_record {
    ($ty:ident) => {
        impl LobsterRecord for $ty {
            const KIND: EventKind = EventKind::$ty;

            fn from_row<S: AsRef<str>>(row: &[S]) -> Result<Self, ParseError> {
                let row = row_fields(row)?;
                expect_kind(row[1], Self::KIND)?;
                Ok(Self {
                    time_since_midnight: parse_time(row[0])?,
                    order_id: parse_u64(row[2], "order_id")?,
                    size: parse_u64(row[3], "size")?,
                    price: parse_u64(row[4], "price")?,
                    direction: parse_i64(row[5], "direction")?,
                })
            }

            fn to_row(&self) -> [String; ROW_WIDTH] {
                [
                    format_secs(self.time_since_midnight),
                    Self::KIND.code().to_string(),
                    self.order_id.to_string(),
                    self.size.to_string(),
                    self.price.to_string(),
                    self.direction.to_string(),
                ]
            }
        }
    };
}

impl_full_record!(Submission);
impl_full_record!(Cancellation);
impl_full_record!(Deletion);
impl_full_record!(ExecutionVisible);
impl_full_record!(CrossTrade);

impl LobsterRecord for ExecutionHidden {
    const KIND: EventKind = EventKind::ExecutionHidden;

    fn from_row<S: AsRef<str>>(row: &[S]) -> Result<Self, ParseError> {
        let row = row_fields(row)?;
        expect_kind(row[1], Self::KIND)?;
        let time_since_midnight = parse_time(row[0])?;
        sentinel_zero(row[2], "order_id")?;
        Ok(Self {
            time_since_midnight,
            size: parse_u64(row[3], "size")?,
            price: parse_u64(row[4], "price")?,
            direction: parse_i64(row[5], "direction")?,
        })
    }

    fn to_row(&self) -> [String; ROW_WIDTH] {
        [
            format_secs(self.time_since_midnight),
            Self::KIND.code().to_string(),
            "0".to_string(),
            self.size.to_string(),
            self.price.to_string(),
            self.direction.to_string(),
        ]
    }
}

impl LobsterRecord for TradingHalt {
    const KIND: EventKind = EventKind::TradingHalt;

    fn from_row<S: AsRef<str>>(row: &[S]) -> Result<Self, ParseError> {
        let row = row_fields(row)?;
        expect_kind(row[1], Self::KIND)?;
        let time_since_midnight = parse_time(row[0])?;
        sentinel_zero(row[2], "order_id")?;
        sentinel_zero(row[3], "size")?;
        let halt_type = HaltReason::from_code(parse_i64(row[4], "halt_type")?)
            .ok_or_else(|| ParseError::InvalidNumericField {
                field: "halt_type",
                value: row[4].to_string(),
            })?;
        sentinel_minus_one(row[5], "direction")?;
        Ok(Self { time_since_midnight, halt_type })
    }

    fn to_row(&self) -> [String; ROW_WIDTH] {
        [
            format_secs(self.time_since_midnight),
            Self::KIND.code().to_string(),
            "0".to_string(),
            "0".to_string(),
            self.halt_type.code().to_string(),
            "-1".to_string(),
        ]
    }
}

/// Any LOBSTER event, dispatched on the kind code in row field 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobsterEvent {
    Submission(Submission),
    Cancellation(Cancellation),
    Deletion(Deletion),
    ExecutionVisible(ExecutionVisible),
    ExecutionHidden(ExecutionHidden),
    CrossTrade(CrossTrade),
    TradingHalt(TradingHalt),
}

impl LobsterEvent {
    /// Parse one row by reading its kind code and delegating to that kind's
    /// record type. A row tagged with an unrecognized code fails with
    /// [`ParseError::UnknownEventKind`] without touching the other fields.
    pub fn from_row<S: AsRef<str>>(row: &[S]) -> Result<Self, ParseError> {
        let code = row
            .get(1)
            .ok_or(ParseError::MalformedRow { found: row.len() })?
            .as_ref();
        let kind = EventKind::from_code(code).ok_or_else(|| ParseError::UnknownEventKind {
            code: code.to_string(),
        })?;
        match kind {
            EventKind::Submission => Submission::from_row(row).map(Self::Submission),
            EventKind::Cancellation => Cancellation::from_row(row).map(Self::Cancellation),
            EventKind::Deletion => Deletion::from_row(row).map(Self::Deletion),
            EventKind::ExecutionVisible => {
                ExecutionVisible::from_row(row).map(Self::ExecutionVisible)
            }
            EventKind::ExecutionHidden => {
                ExecutionHidden::from_row(row).map(Self::ExecutionHidden)
            }
            EventKind::CrossTrade => CrossTrade::from_row(row).map(Self::CrossTrade),
            EventKind::TradingHalt => TradingHalt::from_row(row).map(Self::TradingHalt),
        }
    }

    /// Which of the seven kinds this event is.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Submission(_) => EventKind::Submission,
            Self::Cancellation(_) => EventKind::Cancellation,
            Self::Deletion(_) => EventKind::Deletion,
            Self::ExecutionVisible(_) => EventKind::ExecutionVisible,
            Self::ExecutionHidden(_) => EventKind::ExecutionHidden,
            Self::CrossTrade(_) => EventKind::CrossTrade,
            Self::TradingHalt(_) => EventKind::TradingHalt,
        }
    }

    /// Canonical row form of the wrapped record.
    pub fn to_row(&self) -> [String; ROW_WIDTH] {
        match self {
            Self::Submission(ev) => ev.to_row(),
            Self::Cancellation(ev) => ev.to_row(),
            Self::Deletion(ev) => ev.to_row(),
            Self::ExecutionVisible(ev) => ev.to_row(),
            Self::ExecutionHidden(ev) => ev.to_row(),
            Self::CrossTrade(ev) => ev.to_row(),
            Self::TradingHalt(ev) => ev.to_row(),
        }
    }
}

/// Cancellations and executions serialize in their tagged form,
/// `{"event": {...}, "eventtype": "<code>"}`; the other kinds serialize as
/// their bare record.
impl Serialize for LobsterEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Submission(ev) => ev.serialize(serializer),
            Self::Cancellation(ev) => ev.tagged().serialize(serializer),
            Self::Deletion(ev) => ev.serialize(serializer),
            Self::ExecutionVisible(ev) => ev.tagged().serialize(serializer),
            Self::ExecutionHidden(ev) => ev.tagged().serialize(serializer),
            Self::CrossTrade(ev) => ev.serialize(serializer),
            Self::TradingHalt(ev) => ev.serialize(serializer),
        }
    }
}

/// View a row as exactly [`ROW_WIDTH`] borrowed fields.
fn row_fields<S: AsRef<str>>(row: &[S]) -> Result<[&str; ROW_WIDTH], ParseError> {
    match row {
        [t, k, o, s, p, d] => Ok([
            t.as_ref(),
            k.as_ref(),
            o.as_ref(),
            s.as_ref(),
            p.as_ref(),
            d.as_ref(),
        ]),
        _ => Err(ParseError::MalformedRow { found: row.len() }),
    }
}

fn expect_kind(raw: &str, expected: EventKind) -> Result<(), ParseError> {
    if raw == expected.code() {
        Ok(())
    } else {
        Err(ParseError::WrongEventKind {
            expected,
            actual: raw.to_string(),
        })
    }
}

/// Field 0: non-negative fractional seconds since midnight.
fn parse_time(raw: &str) -> Result<Duration, ParseError> {
    let invalid = || ParseError::InvalidTimeField { value: raw.to_string() };
    let secs: f64 = raw.parse().map_err(|_| invalid())?;
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

fn parse_u64(raw: &str, field: &'static str) -> Result<u64, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidNumericField {
        field,
        value: raw.to_string(),
    })
}

fn parse_i64(raw: &str, field: &'static str) -> Result<i64, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidNumericField {
        field,
        value: raw.to_string(),
    })
}

/// Sentinel check for unsigned columns fixed at `0`.
fn sentinel_zero(raw: &str, field: &'static str) -> Result<(), ParseError> {
    if parse_u64(raw, field)? == 0 {
        Ok(())
    } else {
        Err(ParseError::InvalidFixedField {
            field,
            expected: "0",
            actual: raw.to_string(),
        })
    }
}

/// Sentinel check for signed columns fixed at `-1`.
fn sentinel_minus_one(raw: &str, field: &'static str) -> Result<(), ParseError> {
    if parse_i64(raw, field)? == -1 {
        Ok(())
    } else {
        Err(ParseError::InvalidFixedField {
            field,
            expected: "-1",
            actual: raw.to_string(),
        })
    }
}

/// Canonical time text: seconds with a fixed six-digit fraction, e.g.
/// `34200.189151`.
fn format_secs(time: Duration) -> String {
    format!("{:.6}", time.as_secs_f64())
}

/// Stores a [`Duration`] as integer nanoseconds, the JSON wire form of
/// `timesincemidnight`.
mod duration_nanos {
    use std::time::Duration;

    use serde::de::{Deserialize, Deserializer};
    use serde::ser::{Error as _, Serializer};

    pub fn serialize<S>(time: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = u64::try_from(time.as_nanos())
            .map_err(|_| S::Error::custom("duration out of range for u64 nanoseconds"))?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_nanos(u64::deserialize(deserializer)?))
    }
}
