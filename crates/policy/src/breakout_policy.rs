use forecast::Trend;
use structure::PriceRange;
use trade_core::types::Price;

use crate::signal::Signal;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BreakoutReason {
    BrokeAboveRange,
    BrokeBelowRange,
    InsideRange,
    LowConfidence,
    NoTrend,
}

/// Parameters of the volatility breakout rule
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BreakoutParams {
    pub min_confidence: f64,
    /// Lookback (bars) of the high/low range when the caller does not pass one
    pub window: usize,
}

impl Default for BreakoutParams {
    fn default() -> Self {
        Self {
            min_confidence: 70.0,
            window: 14,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct BreakoutInput {
    pub trend: Trend,
    pub confidence: f64,
    pub last_close: Price,
    /// Range of the bars before the last one
    pub range: PriceRange,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BreakoutDecision {
    pub signal: Signal,
    pub reason: BreakoutReason,
}

/// Close outside the prior range, in the direction of the forecast
pub fn breakout_decision(input: BreakoutInput, params: BreakoutParams) -> BreakoutDecision {
    let hold = |reason| BreakoutDecision {
        signal: Signal::Hold,
        reason,
    };

    if !input.trend.is_up_family() && !input.trend.is_down_family() {
        return hold(BreakoutReason::NoTrend);
    }

    if input.confidence < params.min_confidence {
        return hold(BreakoutReason::LowConfidence);
    }

    if input.trend.is_up_family() && input.last_close.0 > input.range.high.0 {
        return BreakoutDecision {
            signal: Signal::Buy,
            reason: BreakoutReason::BrokeAboveRange,
        };
    }

    if input.trend.is_down_family() && input.last_close.0 < input.range.low.0 {
        return BreakoutDecision {
            signal: Signal::Sell,
            reason: BreakoutReason::BrokeBelowRange,
        };
    }

    hold(BreakoutReason::InsideRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(trend: Trend, confidence: f64, last: f64) -> BreakoutInput {
        BreakoutInput {
            trend,
            confidence,
            last_close: Price(last),
            range: PriceRange {
                high: Price(110.0),
                low: Price(90.0),
            },
        }
    }

    #[test]
    fn buys_breakout_above_high() {
        let d = breakout_decision(input(Trend::Up, 80.0, 111.0), BreakoutParams::default());
        assert_eq!(d.signal, Signal::Buy);
        assert_eq!(d.reason, BreakoutReason::BrokeAboveRange);
    }

    #[test]
    fn sells_breakdown_below_low() {
        let d = breakout_decision(input(Trend::StrongDown, 72.5, 89.0), BreakoutParams::default());
        assert_eq!(d.signal, Signal::Sell);
    }

    #[test]
    fn holds_inside_range() {
        let d = breakout_decision(input(Trend::StrongDown, 72.5, 95.0), BreakoutParams::default());
        assert_eq!(d.signal, Signal::Hold);
        assert_eq!(d.reason, BreakoutReason::InsideRange);
    }

    #[test]
    fn up_trend_does_not_sell_on_breakdown() {
        let d = breakout_decision(input(Trend::Up, 90.0, 80.0), BreakoutParams::default());
        assert_eq!(d.signal, Signal::Hold);
    }

    #[test]
    fn needs_seventy_confidence() {
        let d = breakout_decision(input(Trend::Up, 69.9, 150.0), BreakoutParams::default());
        assert_eq!(d.signal, Signal::Hold);
        assert_eq!(d.reason, BreakoutReason::LowConfidence);

        let d = breakout_decision(input(Trend::Up, 70.0, 150.0), BreakoutParams::default());
        assert_eq!(d.signal, Signal::Buy);
    }
}
