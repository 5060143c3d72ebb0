use std::collections::HashSet;

use chrono::{DateTime, Utc};
use proptest::prelude::*;

use stakan_core::types::Candle;
use stakan_core::{SeriesItem, extend_unique, merge_unique};

fn arb_ts() -> impl Strategy<Value = DateTime<Utc>> {
    // Small range on purpose so key collisions actually happen
    (0i64..40i64).prop_map(|s| DateTime::from_timestamp(s * 60, 0).unwrap())
}

fn arb_candle() -> impl Strategy<Value = Candle> {
    (arb_ts(), "BTC|ETH", 0u32..10_000u32).prop_map(|(open_time, symbol, c)| {
        let px = f64::from(c) / 100.0;
        Candle {
            symbol,
            open_time,
            close_time: open_time + chrono::Duration::seconds(60),
            open: px,
            high: px + 0.5,
            low: px - 0.5,
            close: px,
            volume: f64::from(c),
        }
    })
}

fn arb_series() -> impl Strategy<Value = Vec<Candle>> {
    proptest::collection::vec(arb_candle(), 0..60)
}

proptest! {
    #[test]
    fn merged_keys_are_unique(existing in arb_series(), incoming in arb_series()) {
        let merged = merge_unique(existing, incoming);
        let keys: HashSet<_> = merged.iter().map(SeriesItem::series_key).collect();
        prop_assert_eq!(keys.len(), merged.len());
    }

    #[test]
    fn first_occurrence_wins(existing in arb_series(), incoming in arb_series()) {
        let mut expected_first = Vec::new();
        let mut seen = HashSet::new();
        for c in existing.iter().chain(incoming.iter()) {
            if seen.insert(c.series_key()) {
                expected_first.push(c.clone());
            }
        }
        let merged = merge_unique(existing, incoming);
        prop_assert_eq!(merged, expected_first);
    }

    #[test]
    fn merge_preserves_arrival_order(existing in arb_series(), incoming in arb_series()) {
        let merged = merge_unique(existing.clone(), incoming.clone());
        // Positions of surviving items respect the concatenated input order.
        let concat: Vec<_> = existing.into_iter().chain(incoming).collect();
        let mut cursor = 0;
        for item in &merged {
            let found = concat[cursor..]
                .iter()
                .position(|c| c == item)
                .map(|p| cursor + p);
            prop_assert!(found.is_some());
            cursor = found.unwrap_or(cursor);
        }
    }

    #[test]
    fn merge_is_idempotent(series in arb_series()) {
        let once = merge_unique(Vec::new(), series);
        let twice = merge_unique(once.clone(), once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn extend_reports_appended_count(existing in arb_series(), incoming in arb_series()) {
        let mut base = merge_unique(Vec::new(), existing);
        let before = base.len();
        let appended = extend_unique(&mut base, incoming);
        prop_assert_eq!(base.len(), before + appended);
    }
}

#[test]
fn test_duplicate_snapshot_key_spans_both_sides() {
    use stakan_core::types::{OrderBookSnapshot, PriceLevel};

    let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let deep = OrderBookSnapshot {
        symbol: "BTCUSDT".to_string(),
        timestamp: ts,
        bids: vec![PriceLevel {
            price: 100.0,
            quantity: 2.0,
        }],
        asks: vec![],
    };
    let shallow = OrderBookSnapshot {
        symbol: "BTCUSDT".to_string(),
        timestamp: ts,
        bids: vec![],
        asks: vec![],
    };
    let other_symbol = OrderBookSnapshot {
        symbol: "ETHUSDT".to_string(),
        timestamp: ts,
        ..shallow.clone()
    };

    // Same (symbol, timestamp) collapses even when the levels differ; the
    // first arrival is kept. A different symbol at the same instant survives.
    let merged = merge_unique(vec![deep.clone()], vec![shallow, other_symbol.clone()]);
    assert_eq!(merged, vec![deep, other_symbol]);
}
