use chrono::{DateTime, Utc};

use crate::types::Candle;

/// A price gap between two consecutive candles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Open instant of the later candle (where the gap becomes visible).
    pub at: DateTime<Utc>,
    /// Gap magnitude as an absolute price delta, always positive.
    pub delta: f64,
}

/// Extrema over a candle series. All fields are absent for datasets too small
/// to define them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandleHighlights {
    /// Largest positive `next.open - prev.close` delta.
    pub max_gap_up: Option<Gap>,
    /// Largest magnitude among negative `next.open - prev.close` deltas.
    pub max_gap_down: Option<Gap>,
    /// Candle with the widest `high - low` range.
    pub most_volatile: Option<Candle>,
    /// Candle with the highest volume.
    pub most_voluminous: Option<Candle>,
}

/// Compute gap/volatility/volume extrema over a candle series.
///
/// Candles are taken in input (chronological) order; ties resolve to the
/// first occurrence. Gaps need at least two candles, the per-candle extrema
/// at least one; anything undefined stays `None`. Never fails.
#[must_use]
pub fn candle_highlights(candles: &[Candle]) -> CandleHighlights {
    let mut out = CandleHighlights::default();

    for pair in candles.windows(2) {
        let delta = pair[1].open - pair[0].close;
        let at = pair[1].open_time;
        if delta > 0.0 {
            if out.max_gap_up.as_ref().is_none_or(|g| delta > g.delta) {
                out.max_gap_up = Some(Gap { at, delta });
            }
        } else if delta < 0.0 {
            let magnitude = -delta;
            if out
                .max_gap_down
                .as_ref()
                .is_none_or(|g| magnitude > g.delta)
            {
                out.max_gap_down = Some(Gap {
                    at,
                    delta: magnitude,
                });
            }
        }
    }

    for candle in candles {
        let range = candle.high - candle.low;
        if out
            .most_volatile
            .as_ref()
            .is_none_or(|c| range > c.high - c.low)
        {
            out.most_volatile = Some(candle.clone());
        }
        if out
            .most_voluminous
            .as_ref()
            .is_none_or(|c| candle.volume > c.volume)
        {
            out.most_voluminous = Some(candle.clone());
        }
    }

    out
}
