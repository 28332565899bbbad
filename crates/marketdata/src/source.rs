use async_trait::async_trait;
use structure::candle::{Candle, Timeframe};

use crate::error::MarketDataError;

/// Where historical bars come from.
///
/// Bars are returned oldest first. An empty vec is a valid answer (nothing traded,
/// unknown range), and so is a shorter history than asked for.
#[async_trait]
pub trait BarSource: Send + Sync {
    async fn fetch_bars(
        &self,
        symbol: &str,
        days: u32,
        interval: Timeframe,
    ) -> Result<Vec<Candle>, MarketDataError>;
}

/// Fixed in-memory history, same bars for every symbol
#[derive(Debug, Clone, Default)]
pub struct StaticBars {
    bars: Vec<Candle>,
}

impl StaticBars {
    pub fn new(mut bars: Vec<Candle>) -> Self {
        bars.sort_by_key(|c| c.ts);
        Self { bars }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BarSource for StaticBars {
    async fn fetch_bars(
        &self,
        _symbol: &str,
        _days: u32,
        _interval: Timeframe,
    ) -> Result<Vec<Candle>, MarketDataError> {
        Ok(self.bars.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trade_core::types::{Price, Qty, TimestampMs};

    fn bar(ts: i64) -> Candle {
        Candle {
            ts: TimestampMs(ts),
            open: Price(1.0),
            high: Price(1.0),
            low: Price(1.0),
            close: Price(1.0),
            volume: Qty(0.0),
        }
    }

    #[tokio::test]
    async fn static_bars_come_back_in_time_order() {
        let src = StaticBars::new(vec![bar(3), bar(1), bar(2)]);
        let bars = src.fetch_bars("ANY", 7, Timeframe::Hour1).await.unwrap();
        let ts: Vec<i64> = bars.iter().map(|c| c.ts.0).collect();
        assert_eq!(ts, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn empty_source_is_not_an_error() {
        let bars = StaticBars::empty()
            .fetch_bars("ANY", 1, Timeframe::Min1)
            .await
            .unwrap();
        assert!(bars.is_empty());
    }
}
