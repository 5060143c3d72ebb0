use crate::types::{OrderBookSnapshot, PriceLevel};

/// One step of a cumulative depth curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthPoint {
    /// Level price.
    pub price: f64,
    /// Total quantity resting at this price and all better prices.
    pub cumulative: f64,
}

/// Cumulative depth per order-book side.
///
/// The two sides are independent step sequences over their own price grids;
/// they are deliberately not merged into one row-aligned table because bid
/// and ask prices rarely coincide.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DepthCurve {
    /// Bid side, best (highest) price first.
    pub bids: Vec<DepthPoint>,
    /// Ask side, best (lowest) price first.
    pub asks: Vec<DepthPoint>,
}

/// Compute the cumulative depth curve of one snapshot.
///
/// Bids are sorted price-descending and asks price-ascending independently of
/// the input ordering, then a running quantity sum is taken along each side.
/// Empty sides yield empty curves.
#[must_use]
pub fn depth_curve(snapshot: &OrderBookSnapshot) -> DepthCurve {
    let mut bids = snapshot.bids.clone();
    bids.sort_by(|a, b| b.price.total_cmp(&a.price));
    let mut asks = snapshot.asks.clone();
    asks.sort_by(|a, b| a.price.total_cmp(&b.price));

    DepthCurve {
        bids: accumulate(&bids),
        asks: accumulate(&asks),
    }
}

fn accumulate(levels: &[PriceLevel]) -> Vec<DepthPoint> {
    let mut running = 0.0;
    levels
        .iter()
        .map(|level| {
            running += level.quantity;
            DepthPoint {
                price: level.price,
                cumulative: running,
            }
        })
        .collect()
}
