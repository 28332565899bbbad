use trade_core::types::Price;

use crate::candle::Candle;

/// Highest high / lowest low of a window of bars
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PriceRange {
    pub high: Price,
    pub low: Price,
}

/// Range over the `window` bars ending at the second-to-last bar.
///
/// The last bar is excluded so that its close can be compared against the range.
/// Needs at least `window + 1` bars; `None` otherwise or for `window == 0`.
pub fn prior_range(candles: &[Candle], window: usize) -> Option<PriceRange> {
    if window == 0 || candles.len() < window + 1 {
        return None;
    }

    let end = candles.len() - 1;
    let slice = &candles[end - window..end];

    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    for c in slice {
        high = high.max(c.high.0);
        low = low.min(c.low.0);
    }

    Some(PriceRange {
        high: Price(high),
        low: Price(low),
    })
}
