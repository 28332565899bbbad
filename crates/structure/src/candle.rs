use serde::{Deserialize, Serialize};
use trade_core::types::{Price, Qty, TimestampMs};

/// One OHLCV bar. `ts` is the bar open time.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub ts: TimestampMs,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Qty,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Timeframe {
    Min1,
    Hour1,
}

impl Timeframe {
    pub fn as_millis(self) -> i64 {
        match self {
            Timeframe::Min1 => 60_000,
            Timeframe::Hour1 => 60 * 60_000,
        }
    }

    /// Interval token understood by the chart endpoint ("1m", "1h")
    pub fn as_interval(self) -> &'static str {
        match self {
            Timeframe::Min1 => "1m",
            Timeframe::Hour1 => "1h",
        }
    }
}

pub fn closes(candles: &[Candle]) -> impl Iterator<Item = Price> + '_ {
    candles.iter().map(|c| c.close)
}
