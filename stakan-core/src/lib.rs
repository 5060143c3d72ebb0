//! stakan-core
//!
//! Core data model and pure client-state logic for the stakan market-data
//! dashboard client.
//!
//! - `types`: common data structures (candles, order-book snapshots, queries,
//!   pages and cursors).
//! - `provider`: the `MarketData` trait that transports implement.
//! - `feed`: the generic cursor-pagination engine (`Paginator`).
//! - `series`: order-preserving, key-unique merge of paginated series.
//! - `analytics`: chart-ready derivations (depth curves, spread/imbalance
//!   series, candle highlights, book summaries).
//! - `export`: CSV document rendering for candle datasets.
//!
//! Everything in this crate is transport-agnostic and side-effect free; the
//! only async surface is the `MarketData`/`PageSource` seam awaited by the
//! paginator. Code that drives a paginator must run under a Tokio 1.x
//! runtime because the HTTP provider in `stakan-http` is built on it.
#![warn(missing_docs)]

/// Chart-ready derivations over loaded datasets.
pub mod analytics;
/// Unified error taxonomy for the stakan workspace.
pub mod error;
/// CSV rendering of candle datasets.
pub mod export;
/// Generic cursor-pagination engine with accumulation.
pub mod feed;
/// The `MarketData` provider contract implemented by transports.
pub mod provider;
/// Merge utilities for joining paginated series without duplicates.
pub mod series;
pub mod types;

pub use error::StakanError;
pub use feed::{FeedPhase, FetchOutcome, PageSource, Paginator};
pub use provider::{BookPage, MarketData};
pub use series::{SeriesItem, extend_unique, merge_unique};
pub use types::*;
