//! Chart-ready derivations over loaded datasets.
//!
//! Every function here is pure and stateless: it borrows the dataset
//! read-only, tolerates empty and single-element input (returning a neutral
//! or absent result, never failing), and retains nothing between calls.
//! Crossed books are handled without panicking.
//!
//! Unit conventions, applied consistently across the workspace:
//! - spread is a fraction of the best ask (`(ask - bid) / ask`), not a
//!   percentage;
//! - candle gaps are absolute price deltas, not percentages.
//!
//! Modules include:
//! - `depth`: cumulative depth curves per order-book side;
//! - `spread`: spread and top-of-book imbalance time series;
//! - `highlights`: gap/volatility/volume extrema over candle series;
//! - `summary`: aggregate order-book metrics over a snapshot window.

/// Cumulative depth curves.
pub mod depth;
/// Gap, volatility, and volume extrema over candle series.
pub mod highlights;
/// Spread and imbalance series.
pub mod spread;
/// Aggregate order-book metrics.
pub mod summary;

pub use depth::{DepthCurve, DepthPoint, depth_curve};
pub use highlights::{CandleHighlights, Gap, candle_highlights};
pub use spread::{
    ImbalancePoint, SpreadPoint, TOP_LEVELS, imbalance, imbalance_series, relative_spread,
    spread_series,
};
pub use summary::{BookSummary, Wall, book_summary};
