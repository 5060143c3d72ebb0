//! Stakan is a client layer for market-data dashboards.
//!
//! Overview
//! - Talks to a candle/order-book REST API through the `stakan_core`
//!   [`MarketData`] contract; `stakan-http` provides the production
//!   implementation, `stakan-mock` a deterministic in-process one.
//! - Accumulates cursor-paginated results into arrival-ordered,
//!   duplicate-free feeds with explicit lifecycle phases.
//! - Recomputes order-book analytics (depth curves, spread and imbalance
//!   series, summaries) and candle highlights client-side over whatever
//!   subset is currently loaded.
//! - Exports candle sets as BOM-prefixed CSV documents ready for download.
//!
//! Key behaviors
//! - Feeds guard against overlapping loads: a `fetch_more` racing an
//!   in-flight request fails with the benign `AlreadyLoading`, while a new
//!   `fetch_first` takes over and discards the stale response.
//! - Failed page fetches keep the accumulation and cursor intact, so a
//!   retry resumes where the feed left off.
//! - The HTTP provider refreshes an expired bearer token once per request
//!   and replays; a rejected replay surfaces as an `Auth` error.
//!
//! Building a client against the HTTP provider:
//! ```rust,ignore
//! use std::sync::Arc;
//! use stakan::{HttpMarketData, Stakan};
//!
//! let provider = Arc::new(
//!     HttpMarketData::builder()
//!         .base_url("https://api.example.com")
//!         .build()?,
//! );
//! provider.login("trader", "hunter2").await?;
//!
//! let stakan = Stakan::builder().provider(provider).build()?;
//! ```
//!
//! Paging candles into a feed and exporting them:
//! ```rust,ignore
//! use chrono::{Duration, Utc};
//! use stakan::{CandleQuery, Interval};
//!
//! let feed = stakan.candle_feed();
//! feed.fetch_first(CandleQuery {
//!     symbol: "BTCUSDT".into(),
//!     interval: Interval::M1,
//!     start: Utc::now() - Duration::hours(6),
//!     end: Utc::now(),
//!     page_size: 500,
//! })
//! .await?;
//! while feed.has_more() {
//!     feed.fetch_more().await?;
//! }
//! let csv = stakan.export_candles(&feed.items());
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod feeds;

pub use core::{Stakan, StakanBuilder};
pub use feeds::{BookFeed, BookSource, CandleFeed, CandleSource, candle_feed};

pub use stakan_http::{Credential, HttpMarketData, HttpMarketDataBuilder, TokenStore};

// Re-export core types for convenience
pub use stakan_core::{
    BookPage,
    FeedPhase,
    FetchOutcome,
    MarketData,
    PageSource,
    Paginator,
    StakanError,
    analytics,
    export,
    types::{
        BookAnalysis, BookQuery, Candle, CandleAnalytics, CandleQuery, Interval,
        OrderBookSnapshot, Page, PageToken, PriceLevel, UserInfo,
    },
};
