use marketdata::BarSource;
use marketdata::synthetic::{DEFAULT_START_PRICE, synthetic_candles};
use rand::SeedableRng;
use rand::rngs::StdRng;
use structure::candle::{Candle, Timeframe};
use tracing::{info, warn};
use trade_core::types::TimestampMs;

use crate::error::EngineError;

/// One year of minute bars
pub const MAX_HOURS: i64 = 24 * 365;

const BARS_PER_HOUR: usize = 60;

/// Lookback in days for `hours` of minute bars: one day up to 24h, then whole days plus one
pub fn lookback_days(hours: i64) -> u32 {
    if hours <= 24 {
        1
    } else {
        (hours / 24 + 1) as u32
    }
}

/// Last `hours` of minute candles for `symbol`.
///
/// If the upstream has nothing (empty answer or a failed fetch), returns exactly
/// `hours * 60` synthetic minute candles ending before `now`.
pub async fn historical_candles(
    source: &dyn BarSource,
    symbol: &str,
    hours: i64,
    now: TimestampMs,
) -> Result<Vec<Candle>, EngineError> {
    if !(1..=MAX_HOURS).contains(&hours) {
        return Err(EngineError::InvalidHours {
            got: hours,
            max: MAX_HOURS,
        });
    }

    let needed = hours as usize * BARS_PER_HOUR;

    match source
        .fetch_bars(symbol, lookback_days(hours), Timeframe::Min1)
        .await
    {
        Ok(mut bars) if !bars.is_empty() => {
            // keep only the last `needed` bars
            if bars.len() > needed {
                let excess = bars.len() - needed;
                bars.drain(0..excess);
            }
            info!(symbol, hours, bars = bars.len(), "historical bars served");
            return Ok(bars);
        }
        Ok(_) => warn!(symbol, "upstream returned no data, generating synthetic candles"),
        Err(e) => warn!(symbol, error = %e, "upstream fetch failed, generating synthetic candles"),
    }

    let mut rng = StdRng::from_entropy();
    Ok(synthetic_candles(
        &mut rng,
        needed,
        now,
        Timeframe::Min1.as_millis(),
        DEFAULT_START_PRICE,
    ))
}
