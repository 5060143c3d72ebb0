//! Series utilities shared by the paginator and downstream consumers.
//!
//! Modules include:
//! - `merge`: order-preserving, first-seen-wins merge keyed by
//!   `(symbol, timestamp)` for joining possibly-overlapping pages.

/// Merge utilities for joining paginated series without duplicates.
pub mod merge;

pub use merge::{SeriesItem, extend_unique, merge_unique};
