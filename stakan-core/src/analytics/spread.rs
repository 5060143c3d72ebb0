use chrono::{DateTime, Utc};

use crate::types::{OrderBookSnapshot, PriceLevel};

/// How many levels per side count as "top of book" for volume metrics.
pub const TOP_LEVELS: usize = 10;

/// One point of a spread time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadPoint {
    /// Snapshot instant.
    pub timestamp: DateTime<Utc>,
    /// Relative spread `(best_ask - best_bid) / best_ask`, as a fraction.
    pub spread: f64,
}

/// One point of an imbalance time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImbalancePoint {
    /// Snapshot instant.
    pub timestamp: DateTime<Utc>,
    /// Top-of-book volume imbalance in `[-1, 1]`.
    pub imbalance: f64,
}

/// Relative spread of one snapshot, when defined.
///
/// Returns `None` when either side is empty or the best ask is not a positive
/// price; undefined points are meant to be excluded from series rather than
/// zero-filled, so they cannot skew extrema. A crossed book yields a negative
/// spread, which is kept as-is.
#[must_use]
pub fn relative_spread(snapshot: &OrderBookSnapshot) -> Option<f64> {
    let best_bid = best_price(&snapshot.bids, f64::max)?;
    let best_ask = best_price(&snapshot.asks, f64::min)?;
    if best_ask > 0.0 {
        Some((best_ask - best_bid) / best_ask)
    } else {
        None
    }
}

/// Spread time series over a snapshot sequence, skipping undefined points.
#[must_use]
pub fn spread_series(snapshots: &[OrderBookSnapshot]) -> Vec<SpreadPoint> {
    snapshots
        .iter()
        .filter_map(|s| {
            relative_spread(s).map(|spread| SpreadPoint {
                timestamp: s.timestamp,
                spread,
            })
        })
        .collect()
}

/// Top-of-book volume imbalance of one snapshot.
///
/// `(bid_vol - ask_vol) / (bid_vol + ask_vol)` over the best
/// [`TOP_LEVELS`] levels per side; `0.0` when both volumes are zero (an
/// empty or all-zero book is neutral, not an error).
#[must_use]
pub fn imbalance(snapshot: &OrderBookSnapshot) -> f64 {
    let bid_vol = top_volume(&snapshot.bids, Side::Bid);
    let ask_vol = top_volume(&snapshot.asks, Side::Ask);
    let total = bid_vol + ask_vol;
    if total == 0.0 {
        0.0
    } else {
        (bid_vol - ask_vol) / total
    }
}

/// Imbalance time series over a snapshot sequence.
#[must_use]
pub fn imbalance_series(snapshots: &[OrderBookSnapshot]) -> Vec<ImbalancePoint> {
    snapshots
        .iter()
        .map(|s| ImbalancePoint {
            timestamp: s.timestamp,
            imbalance: imbalance(s),
        })
        .collect()
}

#[derive(Clone, Copy)]
pub(crate) enum Side {
    Bid,
    Ask,
}

/// Total quantity across the best [`TOP_LEVELS`] levels of one side.
pub(crate) fn top_volume(levels: &[PriceLevel], side: Side) -> f64 {
    sorted_top(levels, side)
        .iter()
        .map(|l| l.quantity)
        .sum()
}

/// The best [`TOP_LEVELS`] levels of one side in best-first order.
pub(crate) fn sorted_top(levels: &[PriceLevel], side: Side) -> Vec<PriceLevel> {
    let mut sorted = levels.to_vec();
    match side {
        Side::Bid => sorted.sort_by(|a, b| b.price.total_cmp(&a.price)),
        Side::Ask => sorted.sort_by(|a, b| a.price.total_cmp(&b.price)),
    }
    sorted.truncate(TOP_LEVELS);
    sorted
}

fn best_price(levels: &[PriceLevel], pick: fn(f64, f64) -> f64) -> Option<f64> {
    levels.iter().map(|l| l.price).reduce(pick)
}
