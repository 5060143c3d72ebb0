//! Seeded fixture generation. Every value is a pure function of the query
//! and the page index, so repeated requests return identical data.

use chrono::Duration;

use stakan_core::types::{BookQuery, Candle, CandleQuery, OrderBookSnapshot, PriceLevel};

/// Symbols the mock exchange lists.
pub const SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT", "SOLUSDT", "TONUSDT"];

/// Adjacent pages share their boundary item: page `n` ends with the item
/// page `n + 1` starts with, mirroring an upstream that pages by inclusive
/// timestamp bounds.
fn page_offset(page_size: usize, index: usize) -> usize {
    index * page_size.saturating_sub(1).max(1)
}

fn base_price(symbol: &str) -> f64 {
    // Stable per-symbol anchor so different symbols produce distinct series.
    let seed = symbol.bytes().fold(0u64, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(u64::from(b))
    });
    100.0 + (seed % 900) as f64
}

pub fn candle_page(query: &CandleQuery, index: usize) -> Vec<Candle> {
    let size = query.page_size as usize;
    let step = Duration::seconds(query.interval.seconds());
    let base = base_price(&query.symbol);
    let offset = page_offset(size, index);

    (offset..offset + size)
        .map_while(|i| {
            let open_time = query.start + step * i as i32;
            if open_time >= query.end {
                return None;
            }
            // Low-amplitude deterministic wave keeps OHLC internally consistent.
            let drift = f64::from((i % 17) as u8) - 8.0;
            let open = base + drift;
            let close = base + (f64::from(((i + 1) % 17) as u8) - 8.0);
            Some(Candle {
                symbol: query.symbol.clone(),
                open_time,
                close_time: open_time + step,
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1_000.0 + (i % 7) as f64 * 250.0,
            })
        })
        .collect()
}

pub fn book_page(query: &BookQuery, index: usize) -> Vec<OrderBookSnapshot> {
    let size = query.page_size as usize;
    let base = base_price(&query.symbol);
    let offset = page_offset(size, index);

    (offset..offset + size)
        .map_while(|i| {
            let timestamp = query.start + Duration::seconds(i as i64);
            if timestamp >= query.end {
                return None;
            }
            let mid = base + f64::from((i % 11) as u8) * 0.1;
            Some(OrderBookSnapshot {
                symbol: query.symbol.clone(),
                timestamp,
                bids: ladder(mid - 0.05, -0.1, i),
                asks: ladder(mid + 0.05, 0.1, i),
            })
        })
        .collect()
}

fn ladder(best: f64, step: f64, seed: usize) -> Vec<PriceLevel> {
    (0..12)
        .map(|level| PriceLevel {
            price: best + step * level as f64,
            quantity: 1.0 + ((seed + level) % 5) as f64,
        })
        .collect()
}
