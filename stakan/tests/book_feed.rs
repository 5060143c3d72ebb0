//! Order-book feed behavior under overlapping queries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Semaphore;

use stakan::{
    BookAnalysis, BookPage, BookQuery, Candle, CandleAnalytics, CandleQuery, FetchOutcome,
    MarketData, OrderBookSnapshot, Page, PageToken, Stakan, StakanError, UserInfo,
};

/// Provider whose `book_page` blocks on the "SLOW" symbol until released,
/// so a test can hold one response in flight while another completes.
struct GatedBookProvider {
    entered: Semaphore,
    release: Semaphore,
}

impl GatedBookProvider {
    fn new() -> Self {
        Self {
            entered: Semaphore::new(0),
            release: Semaphore::new(0),
        }
    }

    /// Wait until a gated request is in flight.
    async fn wait_entered(&self) {
        self.entered.acquire().await.unwrap().forget();
    }

    /// Let one gated request complete.
    fn release_one(&self) {
        self.release.add_permits(1);
    }
}

fn analysis(avg_spread_percent: f64) -> BookAnalysis {
    BookAnalysis {
        avg_spread_percent,
        avg_bid_volume_top10: 0.0,
        avg_ask_volume_top10: 0.0,
        imbalance_start: 0.0,
        imbalance_end: 0.0,
        bid_slope: 0.0,
        ask_slope: 0.0,
        max_bid_wall_price: 0.0,
        max_bid_wall_volume: 0.0,
        max_ask_wall_price: 0.0,
        max_ask_wall_volume: 0.0,
    }
}

fn book_page(symbol: &str, avg_spread_percent: f64) -> BookPage {
    BookPage {
        page: Page {
            items: vec![OrderBookSnapshot {
                symbol: symbol.to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                bids: Vec::new(),
                asks: Vec::new(),
            }],
            next: None,
        },
        analysis: Some(analysis(avg_spread_percent)),
    }
}

fn query(symbol: &str) -> BookQuery {
    BookQuery {
        symbol: symbol.to_string(),
        start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap(),
        page_size: 4,
    }
}

#[async_trait]
impl MarketData for GatedBookProvider {
    fn name(&self) -> &'static str {
        "gated-book"
    }

    async fn symbols(&self) -> Result<Vec<String>, StakanError> {
        unimplemented!("not exercised")
    }

    async fn me(&self) -> Result<UserInfo, StakanError> {
        unimplemented!("not exercised")
    }

    async fn candles_page(
        &self,
        _query: &CandleQuery,
        _cursor: Option<&PageToken>,
    ) -> Result<Page<Candle>, StakanError> {
        unimplemented!("not exercised")
    }

    async fn book_page(
        &self,
        query: &BookQuery,
        _cursor: Option<&PageToken>,
    ) -> Result<BookPage, StakanError> {
        if query.symbol == "SLOW" {
            self.entered.add_permits(1);
            self.release.acquire().await.unwrap().forget();
            return Ok(book_page("SLOW", 1.25));
        }
        Ok(book_page("FAST", 4.5))
    }

    async fn analyze_candles(&self, _candles: &[Candle]) -> Result<CandleAnalytics, StakanError> {
        unimplemented!("not exercised")
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_superseded_response_leaves_server_analysis_untouched() {
    let provider = Arc::new(GatedBookProvider::new());
    let stakan = Stakan::builder()
        .provider(Arc::clone(&provider) as Arc<dyn MarketData>)
        .build()
        .expect("provider registered");
    let feed = Arc::new(stakan.book_feed());

    // Hold the SLOW response in flight, then let FAST take over.
    let slow = {
        let feed = Arc::clone(&feed);
        tokio::spawn(async move { feed.fetch_first(query("SLOW")).await })
    };
    provider.wait_entered().await;

    feed.fetch_first(query("FAST")).await.expect("fast page");
    assert_eq!(
        feed.server_analysis().map(|a| a.avg_spread_percent),
        Some(4.5)
    );

    provider.release_one();
    let outcome = slow.await.expect("join").expect("slow fetch");
    assert_eq!(outcome, FetchOutcome::Superseded);

    // The late SLOW response was discarded wholesale: neither the snapshots
    // nor the analysis block belong to it.
    assert_eq!(
        feed.server_analysis().map(|a| a.avg_spread_percent),
        Some(4.5)
    );
    let items = feed.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].symbol, "FAST");
}
