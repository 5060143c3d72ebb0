//! Shared data structures for the stakan client.
//!
//! Wire compatibility notes: candle timestamps travel as protobuf-style
//! `{seconds}` objects (see [`proto_seconds`]), order-book snapshot
//! timestamps as RFC 3339 strings, and page tokens as opaque strings where
//! the empty string means "no further pages".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::StakanError;

/// Serde adapter for protobuf-style `{"seconds": i64}` timestamps.
///
/// Deserialization tolerates an additional `nanos` field; serialization emits
/// seconds only, matching the seconds-resolution wire contract.
pub mod proto_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct SecondsWire {
        seconds: i64,
    }

    #[derive(Deserialize)]
    struct SecondsWireIn {
        seconds: i64,
        #[serde(default)]
        nanos: Option<u32>,
    }

    /// Serialize a `DateTime<Utc>` as `{"seconds": ..}`.
    ///
    /// # Errors
    /// Never fails for in-range datetimes.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        SecondsWire {
            seconds: ts.timestamp(),
        }
        .serialize(ser)
    }

    /// Deserialize `{"seconds": .., "nanos"?: ..}` into a `DateTime<Utc>`.
    ///
    /// # Errors
    /// Fails when the wire value is not an object of that shape or the
    /// seconds value is outside the representable range.
    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let wire = SecondsWireIn::deserialize(de)?;
        DateTime::from_timestamp(wire.seconds, wire.nanos.unwrap_or(0)).ok_or_else(|| {
            serde::de::Error::custom(format!("timestamp out of range: {}s", wire.seconds))
        })
    }
}

/// One OHLCV bar. Immutable once fetched.
///
/// Invariants expected from the upstream API (not re-validated here):
/// `open_time <= close_time`, `low <= {open, close} <= high`, `volume >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Instrument symbol, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Bar open instant (seconds resolution on the wire).
    #[serde(with = "proto_seconds")]
    pub open_time: DateTime<Utc>,
    /// Bar close instant (seconds resolution on the wire).
    #[serde(with = "proto_seconds")]
    pub close_time: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest traded price within the bar.
    pub high: f64,
    /// Lowest traded price within the bar.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume, non-negative.
    pub volume: f64,
}

/// One price level of an order-book side: `(price, quantity)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Level price.
    pub price: f64,
    /// Resting quantity at this price, non-negative.
    pub quantity: f64,
}

/// One order-book state at an instant.
///
/// Bids are expected price-descending and asks price-ascending, but every
/// consumer in this workspace re-sorts defensively rather than trusting the
/// ordering, and crossed books (best bid >= best ask) must not panic any
/// derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Instrument symbol.
    pub symbol: String,
    /// Snapshot instant (RFC 3339 on the wire).
    pub timestamp: DateTime<Utc>,
    /// Buy side levels.
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
    /// Sell side levels.
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
}

/// Candle aggregation interval supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// One minute.
    #[serde(rename = "1m")]
    M1,
    /// Five minutes.
    #[serde(rename = "5m")]
    M5,
    /// Fifteen minutes.
    #[serde(rename = "15m")]
    M15,
    /// One hour.
    #[serde(rename = "1h")]
    H1,
    /// Four hours.
    #[serde(rename = "4h")]
    H4,
    /// One day.
    #[serde(rename = "1d")]
    D1,
}

impl Interval {
    /// Wire representation of the interval.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::H1 => "1h",
            Self::H4 => "4h",
            Self::D1 => "1d",
        }
    }

    /// Bar width in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::M1 => 60,
            Self::M5 => 300,
            Self::M15 => 900,
            Self::H1 => 3_600,
            Self::H4 => 14_400,
            Self::D1 => 86_400,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = StakanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "1h" => Ok(Self::H1),
            "4h" => Ok(Self::H4),
            "1d" => Ok(Self::D1),
            other => Err(StakanError::validation(format!(
                "unknown interval: {other:?}"
            ))),
        }
    }
}

/// Opaque continuation cursor identifying the next page of a result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    /// Wrap an opaque token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Normalize a wire-level optional token: the upstream API signals
    /// exhaustion both by omitting the field and by sending an empty string.
    #[must_use]
    pub fn from_wire(token: Option<String>) -> Option<Self> {
        token.filter(|t| !t.is_empty()).map(Self)
    }

    /// The raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bounded batch of items plus an optional continuation cursor.
///
/// `next: Some(..)` means more data may exist; `None` is the terminal signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in arrival order.
    pub items: Vec<T>,
    /// Cursor for the next page, absent when the result set is exhausted.
    pub next: Option<PageToken>,
}

impl<T> Page<T> {
    /// A terminal page with no items and no continuation.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            next: None,
        }
    }
}

/// User-specified filter identifying one logical candle result set.
///
/// Equality of all fields means "same result set, different page"; the
/// paginator uses this to decide whether accumulation carries over.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleQuery {
    /// Instrument symbol.
    pub symbol: String,
    /// Aggregation interval.
    pub interval: Interval,
    /// Range start (inclusive).
    pub start: DateTime<Utc>,
    /// Range end (exclusive).
    pub end: DateTime<Utc>,
    /// Requested page size.
    pub page_size: u32,
}

impl CandleQuery {
    /// Reject malformed input before any request is sent.
    ///
    /// # Errors
    /// `Validation` when the symbol is blank, the range is inverted, or the
    /// page size is zero.
    pub fn validate(&self) -> Result<(), StakanError> {
        validate_range(&self.symbol, self.start, self.end, self.page_size)
    }
}

/// User-specified filter identifying one logical order-book result set.
#[derive(Debug, Clone, PartialEq)]
pub struct BookQuery {
    /// Instrument symbol.
    pub symbol: String,
    /// Range start (inclusive).
    pub start: DateTime<Utc>,
    /// Range end (exclusive).
    pub end: DateTime<Utc>,
    /// Requested page size.
    pub page_size: u32,
}

impl BookQuery {
    /// Reject malformed input before any request is sent.
    ///
    /// # Errors
    /// `Validation` when the symbol is blank, the range is inverted, or the
    /// page size is zero.
    pub fn validate(&self) -> Result<(), StakanError> {
        validate_range(&self.symbol, self.start, self.end, self.page_size)
    }
}

fn validate_range(
    symbol: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    page_size: u32,
) -> Result<(), StakanError> {
    if symbol.trim().is_empty() {
        return Err(StakanError::validation("symbol must not be empty"));
    }
    if start > end {
        return Err(StakanError::validation(format!(
            "range start {start} is after end {end}"
        )));
    }
    if page_size == 0 {
        return Err(StakanError::validation("page size must be at least 1"));
    }
    Ok(())
}

/// Authenticated user identity returned by `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Opaque user identifier.
    pub user_id: String,
    /// Role labels granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Server-computed order-book analysis block attached to snapshot pages.
///
/// Informational passthrough; the client derives its own equivalent via
/// [`crate::analytics::book_summary`]. Spread values here follow the server's
/// unit choice and are not normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookAnalysis {
    /// Mean relative spread over the page.
    pub avg_spread_percent: f64,
    /// Mean bid volume across the top 10 levels.
    pub avg_bid_volume_top10: f64,
    /// Mean ask volume across the top 10 levels.
    pub avg_ask_volume_top10: f64,
    /// Volume imbalance at the first snapshot of the page.
    pub imbalance_start: f64,
    /// Volume imbalance at the last snapshot of the page.
    pub imbalance_end: f64,
    /// Bid-side depth slope.
    pub bid_slope: f64,
    /// Ask-side depth slope.
    pub ask_slope: f64,
    /// Price of the largest bid wall.
    pub max_bid_wall_price: f64,
    /// Quantity of the largest bid wall.
    pub max_bid_wall_volume: f64,
    /// Price of the largest ask wall.
    pub max_ask_wall_price: f64,
    /// Quantity of the largest ask wall.
    pub max_ask_wall_volume: f64,
}

/// Server-computed candle analytics returned by `POST /analyze-csv`.
///
/// All fields are optional so that partial server responses decode cleanly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandleAnalytics {
    /// Largest positive gap between consecutive candles (absolute price).
    #[serde(default)]
    pub max_gap_up: Option<f64>,
    /// Largest magnitude of negative gap between consecutive candles.
    #[serde(default)]
    pub max_gap_down: Option<f64>,
    /// The candle with the widest high-low range.
    #[serde(default)]
    pub most_volatile_candle: Option<Candle>,
    /// The candle with the highest volume.
    #[serde(default)]
    pub most_volume_candle: Option<Candle>,
    /// Mean candle body size `|close - open|`.
    #[serde(default)]
    pub avg_body_size: Option<f64>,
    /// Mean upper wick size `high - max(open, close)`.
    #[serde(default)]
    pub avg_upper_wick: Option<f64>,
    /// Mean lower wick size `min(open, close) - low`.
    #[serde(default)]
    pub avg_lower_wick: Option<f64>,
}
