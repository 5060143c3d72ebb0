use std::collections::HashSet;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::types::{Candle, OrderBookSnapshot};

/// An item of a paginated series with a stable identity key.
///
/// Pagination can re-serve a boundary item on consecutive pages; the key is
/// what makes such duplicates detectable. For market data the identity is the
/// pair `(symbol, timestamp)`.
pub trait SeriesItem {
    /// Identity key type.
    type Key: Eq + Hash;

    /// The identity of this item within its series.
    fn series_key(&self) -> Self::Key;
}

impl SeriesItem for Candle {
    type Key = (String, DateTime<Utc>);

    fn series_key(&self) -> Self::Key {
        (self.symbol.clone(), self.open_time)
    }
}

impl SeriesItem for OrderBookSnapshot {
    type Key = (String, DateTime<Utc>);

    fn series_key(&self) -> Self::Key {
        (self.symbol.clone(), self.timestamp)
    }
}

/// Append `incoming` items to `existing`, skipping any whose key is already
/// present. First-seen content wins; relative order of first appearance is
/// preserved. Returns the number of items actually appended.
pub fn extend_unique<T: SeriesItem>(
    existing: &mut Vec<T>,
    incoming: impl IntoIterator<Item = T>,
) -> usize {
    let mut seen: HashSet<T::Key> = existing.iter().map(SeriesItem::series_key).collect();
    let mut appended = 0;
    for item in incoming {
        if seen.insert(item.series_key()) {
            existing.push(item);
            appended += 1;
        }
    }
    appended
}

/// Merge two possibly-overlapping sequences into one duplicate-free sequence.
///
/// Each `(symbol, timestamp)` key appears exactly once in the output, keeping
/// the first-seen item content; `existing` items keep their relative order and
/// new unique `incoming` items are appended in arrival order. Duplicates
/// already present within `existing` itself are also collapsed.
#[must_use]
pub fn merge_unique<T: SeriesItem>(existing: Vec<T>, incoming: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(existing.len() + incoming.len());
    extend_unique(&mut out, existing);
    extend_unique(&mut out, incoming);
    out
}
