use std::sync::Arc;

use chrono::{TimeZone, Utc};

use stakan::{
    BookQuery, CandleQuery, FeedPhase, FetchOutcome, Interval, Stakan, StakanError,
};
use stakan_mock::MockMarket;

fn client() -> Stakan {
    Stakan::builder()
        .provider(Arc::new(MockMarket::new()))
        .build()
        .expect("provider registered")
}

fn candle_query() -> CandleQuery {
    CandleQuery {
        symbol: "BTCUSDT".to_string(),
        interval: Interval::M1,
        start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        page_size: 5,
    }
}

fn book_query() -> BookQuery {
    BookQuery {
        symbol: "BTCUSDT".to_string(),
        start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap(),
        page_size: 4,
    }
}

#[test]
fn test_builder_requires_provider() {
    let err = Stakan::builder().build().expect_err("no provider");
    assert!(matches!(err, StakanError::Validation(_)));
}

#[tokio::test]
async fn test_symbols_and_identity_pass_through() {
    let stakan = client();
    assert_eq!(stakan.provider_name(), "stakan-mock");

    let symbols = stakan.symbols().await.expect("symbols");
    assert!(symbols.contains(&"BTCUSDT".to_string()));

    let me = stakan.me().await.expect("identity");
    assert_eq!(me.user_id, "mock-user");
}

#[tokio::test]
async fn test_candle_feed_drains_all_pages_without_duplicates() {
    let stakan = client();
    let feed = stakan.candle_feed();
    assert_eq!(feed.phase(), FeedPhase::Idle);

    let outcome = feed.fetch_first(candle_query()).await.expect("first page");
    assert_eq!(
        outcome,
        FetchOutcome::Appended {
            new_items: 5,
            more: true
        }
    );

    while feed.has_more() {
        feed.fetch_more().await.expect("next page");
    }
    assert_eq!(feed.phase(), FeedPhase::Exhausted);

    // Three pages of five with a shared boundary item collapse to 13.
    let items = feed.items();
    assert_eq!(items.len(), 13);
    let mut open_times: Vec<_> = items.iter().map(|c| c.open_time).collect();
    open_times.dedup();
    assert_eq!(open_times.len(), items.len());

    let err = feed.fetch_more().await.expect_err("exhausted");
    assert!(matches!(err, StakanError::NoMorePages));
}

#[tokio::test]
async fn test_book_feed_exposes_server_analysis() {
    let stakan = client();
    let feed = stakan.book_feed();
    assert!(feed.server_analysis().is_none());

    feed.fetch_first(book_query()).await.expect("first page");
    let analysis = feed.server_analysis().expect("analysis stashed");
    assert!(analysis.avg_spread_percent > 0.0);

    feed.reset();
    assert!(feed.is_empty());
    assert!(feed.server_analysis().is_none());
    assert_eq!(feed.phase(), FeedPhase::Idle);
}

#[tokio::test]
async fn test_failed_page_keeps_progress_for_retry() {
    let provider = Arc::new(MockMarket::new());
    let stakan = Stakan::builder()
        .provider(Arc::clone(&provider) as Arc<dyn stakan::MarketData>)
        .build()
        .expect("provider registered");

    let feed = stakan.candle_feed();
    feed.fetch_first(candle_query()).await.expect("first page");
    let before = feed.items();

    provider.fail_next();
    let err = feed.fetch_more().await.expect_err("injected failure");
    assert!(matches!(err, StakanError::Network(_)));
    assert_eq!(feed.items(), before);
    assert!(feed.has_more());

    feed.fetch_more().await.expect("retry succeeds");
    assert!(feed.len() > before.len());
}

#[tokio::test]
async fn test_analyze_and_export() {
    let stakan = client();
    let feed = stakan.candle_feed();
    feed.fetch_first(candle_query()).await.expect("first page");
    let candles = feed.items();

    let analytics = stakan.analyze_candles(&candles).await.expect("analytics");
    assert!(analytics.most_volume_candle.is_some());

    let doc = stakan.export_candles(&candles).expect("document");
    assert!(doc.content.starts_with('\u{feff}'));
    assert!(doc.file_name.starts_with("BTCUSDT_candles_"));
    assert_eq!(doc.content.lines().count(), candles.len() + 1);

    assert!(stakan.export_candles(&[]).is_none());
}
