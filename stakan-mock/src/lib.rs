//! Deterministic in-process [`MarketData`] provider.
//!
//! `MockMarket` serves synthetic candles and order-book snapshots from a
//! seeded generator, paged with `page-{n}` cursors. Consecutive pages share
//! their boundary item so that accumulation-layer tests exercise duplicate
//! collapsing against realistic input. Failure paths are reachable through
//! the reserved `"FAIL"` symbol (a permanent server error) and
//! [`MockMarket::fail_next`] (a one-shot transient error).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use stakan_core::types::{
    BookAnalysis, BookQuery, Candle, CandleAnalytics, CandleQuery, OrderBookSnapshot, Page,
    PageToken, UserInfo,
};
use stakan_core::{BookPage, MarketData, StakanError, analytics};

mod fixtures;

/// In-process provider backed by generated fixtures.
pub struct MockMarket {
    pages: usize,
    candle_requests: AtomicUsize,
    book_requests: AtomicUsize,
    fail_next: AtomicBool,
}

impl Default for MockMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarket {
    /// A provider serving three pages per query.
    #[must_use]
    pub fn new() -> Self {
        Self::with_pages(3)
    }

    /// A provider serving `pages` pages per query (at least one).
    #[must_use]
    pub fn with_pages(pages: usize) -> Self {
        Self {
            pages: pages.max(1),
            candle_requests: AtomicUsize::new(0),
            book_requests: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next candle or book request fail with a transient network
    /// error, then recover.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of candle page requests served or failed so far.
    #[must_use]
    pub fn candle_requests(&self) -> usize {
        self.candle_requests.load(Ordering::SeqCst)
    }

    /// Number of book page requests served or failed so far.
    #[must_use]
    pub fn book_requests(&self) -> usize {
        self.book_requests.load(Ordering::SeqCst)
    }

    fn check_failures(&self, symbol: &str) -> Result<(), StakanError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StakanError::network("injected failure"));
        }
        if symbol == "FAIL" {
            return Err(StakanError::server(500, "forced failure: FAIL"));
        }
        Ok(())
    }

    fn page_index(&self, cursor: Option<&PageToken>) -> Result<usize, StakanError> {
        let Some(token) = cursor else { return Ok(0) };
        token
            .as_str()
            .strip_prefix("page-")
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n < self.pages)
            .ok_or_else(|| {
                StakanError::validation(format!("unknown page token `{}`", token.as_str()))
            })
    }

    fn next_token(&self, index: usize) -> Option<PageToken> {
        (index + 1 < self.pages).then(|| PageToken::new(format!("page-{}", index + 1)))
    }
}

#[async_trait]
impl MarketData for MockMarket {
    fn name(&self) -> &'static str {
        "stakan-mock"
    }

    async fn symbols(&self) -> Result<Vec<String>, StakanError> {
        Ok(fixtures::SYMBOLS.iter().map(|s| (*s).to_string()).collect())
    }

    async fn me(&self) -> Result<UserInfo, StakanError> {
        Ok(UserInfo {
            user_id: "mock-user".to_string(),
            roles: vec!["trader".to_string()],
        })
    }

    async fn candles_page(
        &self,
        query: &CandleQuery,
        cursor: Option<&PageToken>,
    ) -> Result<Page<Candle>, StakanError> {
        query.validate()?;
        self.candle_requests.fetch_add(1, Ordering::SeqCst);
        self.check_failures(&query.symbol)?;
        let index = self.page_index(cursor)?;
        Ok(Page {
            items: fixtures::candle_page(query, index),
            next: self.next_token(index),
        })
    }

    async fn book_page(
        &self,
        query: &BookQuery,
        cursor: Option<&PageToken>,
    ) -> Result<BookPage, StakanError> {
        query.validate()?;
        self.book_requests.fetch_add(1, Ordering::SeqCst);
        self.check_failures(&query.symbol)?;
        let index = self.page_index(cursor)?;
        let snapshots = fixtures::book_page(query, index);
        let analysis = analysis_for(&snapshots);
        Ok(BookPage {
            page: Page {
                items: snapshots,
                next: self.next_token(index),
            },
            analysis,
        })
    }

    async fn analyze_candles(&self, candles: &[Candle]) -> Result<CandleAnalytics, StakanError> {
        if candles.is_empty() {
            return Err(StakanError::validation("no candles to analyze"));
        }
        Ok(analyze(candles))
    }
}

/// Server-side analysis block recomputed locally from the page contents.
fn analysis_for(snapshots: &[OrderBookSnapshot]) -> Option<BookAnalysis> {
    let summary = analytics::book_summary(snapshots)?;
    let (bid_price, bid_volume) = summary
        .max_bid_wall
        .map_or((0.0, 0.0), |w| (w.price, w.quantity));
    let (ask_price, ask_volume) = summary
        .max_ask_wall
        .map_or((0.0, 0.0), |w| (w.price, w.quantity));
    Some(BookAnalysis {
        avg_spread_percent: summary.avg_spread * 100.0,
        avg_bid_volume_top10: summary.avg_bid_volume_top10,
        avg_ask_volume_top10: summary.avg_ask_volume_top10,
        imbalance_start: summary.imbalance_start,
        imbalance_end: summary.imbalance_end,
        bid_slope: summary.bid_slope,
        ask_slope: summary.ask_slope,
        max_bid_wall_price: bid_price,
        max_bid_wall_volume: bid_volume,
        max_ask_wall_price: ask_price,
        max_ask_wall_volume: ask_volume,
    })
}

fn analyze(candles: &[Candle]) -> CandleAnalytics {
    let highlights = analytics::candle_highlights(candles);
    let count = candles.len() as f64;
    let mean = |f: fn(&Candle) -> f64| Some(candles.iter().map(f).sum::<f64>() / count);
    CandleAnalytics {
        max_gap_up: highlights.max_gap_up.map(|g| g.delta),
        max_gap_down: highlights.max_gap_down.map(|g| g.delta),
        most_volatile_candle: highlights.most_volatile,
        most_volume_candle: highlights.most_voluminous,
        avg_body_size: mean(|c| (c.close - c.open).abs()),
        avg_upper_wick: mean(|c| c.high - c.open.max(c.close)),
        avg_lower_wick: mean(|c| c.open.min(c.close) - c.low),
    }
}
