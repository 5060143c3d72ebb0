use chrono::{TimeZone, Utc};
use serde_json::json;

use stakan_core::StakanError;
use stakan_core::types::{BookQuery, Candle, CandleQuery, Interval, OrderBookSnapshot, PageToken};

#[test]
fn test_candle_timestamps_use_proto_seconds() {
    let wire = json!({
        "symbol": "BTCUSDT",
        "open_time": { "seconds": 1_709_294_400 },
        "close_time": { "seconds": 1_709_294_460, "nanos": 0 },
        "open": 100.0,
        "high": 101.0,
        "low": 99.0,
        "close": 100.5,
        "volume": 1000.0
    });
    let candle: Candle = serde_json::from_value(wire).expect("decodes");
    assert_eq!(
        candle.open_time,
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    );

    let back = serde_json::to_value(&candle).expect("encodes");
    assert_eq!(back["open_time"]["seconds"], 1_709_294_400i64);
}

#[test]
fn test_snapshot_sides_default_to_empty() {
    let wire = json!({
        "symbol": "BTCUSDT",
        "timestamp": "2024-03-01T12:00:00Z"
    });
    let snap: OrderBookSnapshot = serde_json::from_value(wire).expect("decodes");
    assert!(snap.bids.is_empty());
    assert!(snap.asks.is_empty());
}

#[test]
fn test_interval_round_trip() {
    for (interval, s) in [
        (Interval::M1, "1m"),
        (Interval::M5, "5m"),
        (Interval::M15, "15m"),
        (Interval::H1, "1h"),
        (Interval::H4, "4h"),
        (Interval::D1, "1d"),
    ] {
        assert_eq!(interval.as_str(), s);
        assert_eq!(s.parse::<Interval>().expect("parses"), interval);
    }
    assert!(matches!(
        "2w".parse::<Interval>(),
        Err(StakanError::Validation(_))
    ));
}

#[test]
fn test_empty_wire_token_means_exhausted() {
    assert!(PageToken::from_wire(None).is_none());
    assert!(PageToken::from_wire(Some(String::new())).is_none());
    assert_eq!(
        PageToken::from_wire(Some("p1".to_string())),
        Some(PageToken::new("p1"))
    );
}

#[test]
fn test_query_validation() {
    let valid = CandleQuery {
        symbol: "BTCUSDT".to_string(),
        interval: Interval::M1,
        start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        page_size: 100,
    };
    assert!(valid.validate().is_ok());

    let blank_symbol = CandleQuery {
        symbol: "  ".to_string(),
        ..valid.clone()
    };
    assert!(matches!(
        blank_symbol.validate(),
        Err(StakanError::Validation(_))
    ));

    let inverted = BookQuery {
        symbol: "BTCUSDT".to_string(),
        start: valid.end,
        end: valid.start,
        page_size: 100,
    };
    assert!(matches!(inverted.validate(), Err(StakanError::Validation(_))));

    let zero_page = BookQuery {
        symbol: "BTCUSDT".to_string(),
        start: valid.start,
        end: valid.end,
        page_size: 0,
    };
    assert!(matches!(
        zero_page.validate(),
        Err(StakanError::Validation(_))
    ));
}
