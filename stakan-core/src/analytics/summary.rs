use crate::analytics::spread::{Side, relative_spread, sorted_top};
use crate::analytics::{imbalance, spread};
use crate::types::OrderBookSnapshot;

/// The single largest resting order observed on one side of the book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    /// Price of the wall level.
    pub price: f64,
    /// Quantity of the wall level.
    pub quantity: f64,
}

/// Aggregate order-book metrics over a snapshot window.
///
/// Client-side equivalent of the server's analysis block, so the dashboard
/// can recompute metrics from whatever subset of snapshots is currently
/// loaded. Spread is a fraction (see [`crate::analytics`]).
#[derive(Debug, Clone, PartialEq)]
pub struct BookSummary {
    /// Mean relative spread over snapshots where the spread is defined.
    pub avg_spread: f64,
    /// Mean bid volume across the best [`TOP_LEVELS`](crate::analytics::TOP_LEVELS) levels.
    pub avg_bid_volume_top10: f64,
    /// Mean ask volume across the best [`TOP_LEVELS`](crate::analytics::TOP_LEVELS) levels.
    pub avg_ask_volume_top10: f64,
    /// Imbalance at the first snapshot of the window.
    pub imbalance_start: f64,
    /// Imbalance at the last snapshot of the window.
    pub imbalance_end: f64,
    /// Mean least-squares slope of cumulative bid depth over price.
    pub bid_slope: f64,
    /// Mean least-squares slope of cumulative ask depth over price.
    pub ask_slope: f64,
    /// Largest single bid level across the window, first occurrence on ties.
    pub max_bid_wall: Option<Wall>,
    /// Largest single ask level across the window, first occurrence on ties.
    pub max_ask_wall: Option<Wall>,
}

/// Summarize a snapshot window. Returns `None` for empty input.
///
/// Averages run over all snapshots except the spread average, which only
/// counts snapshots with a defined spread (excluded points would otherwise
/// drag the mean toward zero). Slopes are least-squares fits of cumulative
/// quantity against price over the best [`TOP_LEVELS`](crate::analytics::TOP_LEVELS) levels, averaged over
/// the window; sides with fewer than two levels contribute zero.
#[must_use]
pub fn book_summary(snapshots: &[OrderBookSnapshot]) -> Option<BookSummary> {
    let first = snapshots.first()?;
    let last = snapshots.last()?;
    let count = snapshots.len() as f64;

    let spreads: Vec<f64> = snapshots.iter().filter_map(relative_spread).collect();
    let avg_spread = if spreads.is_empty() {
        0.0
    } else {
        spreads.iter().sum::<f64>() / spreads.len() as f64
    };

    let mut bid_volume = 0.0;
    let mut ask_volume = 0.0;
    let mut bid_slope = 0.0;
    let mut ask_slope = 0.0;
    let mut max_bid_wall: Option<Wall> = None;
    let mut max_ask_wall: Option<Wall> = None;

    for snapshot in snapshots {
        bid_volume += spread::top_volume(&snapshot.bids, Side::Bid);
        ask_volume += spread::top_volume(&snapshot.asks, Side::Ask);
        bid_slope += depth_slope(snapshot, Side::Bid);
        ask_slope += depth_slope(snapshot, Side::Ask);
        track_wall(&mut max_bid_wall, &snapshot.bids);
        track_wall(&mut max_ask_wall, &snapshot.asks);
    }

    Some(BookSummary {
        avg_spread,
        avg_bid_volume_top10: bid_volume / count,
        avg_ask_volume_top10: ask_volume / count,
        imbalance_start: imbalance(first),
        imbalance_end: imbalance(last),
        bid_slope: bid_slope / count,
        ask_slope: ask_slope / count,
        max_bid_wall,
        max_ask_wall,
    })
}

fn track_wall(current: &mut Option<Wall>, levels: &[crate::types::PriceLevel]) {
    for level in levels {
        if current.is_none_or(|w| level.quantity > w.quantity) {
            *current = Some(Wall {
                price: level.price,
                quantity: level.quantity,
            });
        }
    }
}

/// Least-squares slope of cumulative quantity over price for one side,
/// restricted to the best [`TOP_LEVELS`](crate::analytics::TOP_LEVELS) levels. Zero when the fit is
/// undefined (fewer than two levels, or no price variance).
fn depth_slope(snapshot: &OrderBookSnapshot, side: Side) -> f64 {
    let levels = match side {
        Side::Bid => sorted_top(&snapshot.bids, Side::Bid),
        Side::Ask => sorted_top(&snapshot.asks, Side::Ask),
    };
    if levels.len() < 2 {
        return 0.0;
    }

    let mut cumulative = 0.0;
    let points: Vec<(f64, f64)> = levels
        .iter()
        .map(|l| {
            cumulative += l.quantity;
            (l.price, cumulative)
        })
        .collect();

    least_squares_slope(&points)
}

fn least_squares_slope(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var = 0.0;
    for (x, y) in points {
        cov += (x - mean_x) * (y - mean_y);
        var += (x - mean_x) * (x - mean_x);
    }
    if var == 0.0 { 0.0 } else { cov / var }
}
