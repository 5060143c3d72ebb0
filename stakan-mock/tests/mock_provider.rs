use chrono::{TimeZone, Utc};

use stakan_core::types::{BookQuery, CandleQuery, Interval, PageToken};
use stakan_core::{MarketData, StakanError};
use stakan_mock::MockMarket;

fn candle_query(symbol: &str) -> CandleQuery {
    CandleQuery {
        symbol: symbol.to_string(),
        interval: Interval::M1,
        start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        page_size: 5,
    }
}

fn book_query(symbol: &str) -> BookQuery {
    BookQuery {
        symbol: symbol.to_string(),
        start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap(),
        page_size: 4,
    }
}

#[tokio::test]
async fn test_candle_pages_are_deterministic_and_linked() {
    let mock = MockMarket::new();
    let query = candle_query("BTCUSDT");

    let first = mock.candles_page(&query, None).await.expect("first page");
    assert_eq!(first.items.len(), 5);
    let token = first.next.clone().expect("continuation");
    assert_eq!(token.as_str(), "page-1");

    let again = mock.candles_page(&query, None).await.expect("replay");
    assert_eq!(first, again);

    let second = mock
        .candles_page(&query, Some(&token))
        .await
        .expect("second page");
    // Boundary item appears on both pages.
    assert_eq!(first.items.last(), second.items.first());
}

#[tokio::test]
async fn test_last_page_has_no_continuation() {
    let mock = MockMarket::with_pages(2);
    let query = candle_query("ETHUSDT");

    let first = mock.candles_page(&query, None).await.expect("first");
    let token = first.next.expect("continuation");
    let last = mock.candles_page(&query, Some(&token)).await.expect("last");
    assert!(last.next.is_none());
}

#[tokio::test]
async fn test_unknown_token_rejected() {
    let mock = MockMarket::new();
    let err = mock
        .candles_page(&candle_query("BTCUSDT"), Some(&PageToken::new("bogus")))
        .await
        .expect_err("bad token");
    assert!(matches!(err, StakanError::Validation(_)));
}

#[tokio::test]
async fn test_fail_symbol_and_fail_next() {
    let mock = MockMarket::new();

    let err = mock
        .candles_page(&candle_query("FAIL"), None)
        .await
        .expect_err("forced failure");
    assert!(matches!(err, StakanError::Server { status: 500, .. }));

    mock.fail_next();
    let err = mock
        .candles_page(&candle_query("BTCUSDT"), None)
        .await
        .expect_err("injected failure");
    assert!(matches!(err, StakanError::Network(_)));

    // One-shot: the next request recovers.
    mock.candles_page(&candle_query("BTCUSDT"), None)
        .await
        .expect("recovered");
    assert_eq!(mock.candle_requests(), 3);
}

#[tokio::test]
async fn test_book_page_carries_analysis() {
    let mock = MockMarket::new();
    let page = mock
        .book_page(&book_query("SOLUSDT"), None)
        .await
        .expect("book page");
    assert_eq!(page.page.items.len(), 4);

    let analysis = page.analysis.expect("analysis block");
    assert!(analysis.avg_spread_percent > 0.0);
    assert!(analysis.imbalance_start.abs() <= 1.0);
    assert!(analysis.max_bid_wall_volume > 0.0);
}

#[tokio::test]
async fn test_analyze_rejects_empty_input() {
    let mock = MockMarket::new();
    let err = mock.analyze_candles(&[]).await.expect_err("empty input");
    assert!(matches!(err, StakanError::Validation(_)));
}

#[tokio::test]
async fn test_analyze_computes_extrema() {
    let mock = MockMarket::new();
    let query = candle_query("BTCUSDT");
    let page = mock.candles_page(&query, None).await.expect("page");

    let analytics = mock
        .analyze_candles(&page.items)
        .await
        .expect("analysis");
    assert!(analytics.most_volume_candle.is_some());
    assert!(analytics.avg_body_size.is_some());
}
