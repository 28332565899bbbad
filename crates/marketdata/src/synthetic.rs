//! Made-up market data: fallback candles when the upstream has nothing, and the
//! random-walk ticks behind the realtime feed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use structure::candle::Candle;
use trade_core::types::{Price, Qty, TimestampMs};

/// Where synthetic series start when nothing better is known
pub const DEFAULT_START_PRICE: Price = Price(67_000.0);

const MAX_BODY_MOVE: f64 = 100.0;
const MAX_WICK: f64 = 50.0;
const MAX_VOLUME: f64 = 5.0;

/// `count` bars spaced `step_ms` apart, the last one opening at `now - step_ms`.
///
/// Each bar opens at the previous close; closes drift by up to ±100 and wicks extend
/// up to 50 beyond the body.
pub fn synthetic_candles<R: Rng>(
    rng: &mut R,
    count: usize,
    now: TimestampMs,
    step_ms: i64,
    start_price: Price,
) -> Vec<Candle> {
    let mut out = Vec::with_capacity(count);
    let mut price = start_price.0;

    for i in 0..count {
        let ts = now.0 - (count - i) as i64 * step_ms;
        let open = price;
        let close = open + rng.gen_range(-MAX_BODY_MOVE..MAX_BODY_MOVE);
        let high = open.max(close) + rng.gen_range(0.0..MAX_WICK);
        let low = open.min(close) - rng.gen_range(0.0..MAX_WICK);
        price = close;

        out.push(Candle {
            ts: TimestampMs(ts),
            open: Price(open).round_dp(2),
            high: Price(high).round_dp(2),
            low: Price(low).round_dp(2),
            close: Price(close).round_dp(2),
            volume: Qty(rng.gen_range(0.0..MAX_VOLUME)).round_dp(4),
        });
    }

    out
}

/// One realtime price update
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub ts: TimestampMs,
    pub price: Price,
}

/// Unbounded random walk, one step per tick
#[derive(Debug, Clone)]
pub struct PriceWalk {
    price: f64,
    max_step: f64,
}

impl PriceWalk {
    pub fn new(start: Price, max_step: f64) -> Self {
        Self {
            price: start.0,
            max_step: max_step.abs(),
        }
    }

    pub fn next_tick<R: Rng>(&mut self, rng: &mut R, ts: TimestampMs) -> PriceTick {
        if self.max_step > 0.0 {
            self.price += rng.gen_range(-self.max_step..self.max_step);
        }
        PriceTick {
            ts,
            price: Price(self.price).round_dp(2),
        }
    }
}
