use forecast::Trend;
use trade_core::types::Price;

use crate::signal::Signal;

/// Why the rule decided what it decided (for logs)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MomentumReason {
    TrendUpAboveEma,
    TrendDownBelowEma,
    LowConfidence,
    PriceDisagrees,
    NoTrend,
}

/// Parameters of the momentum rule
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MomentumParams {
    /// Gate: forecast confidence must be at least this (percent)
    pub min_confidence: f64,
    /// EMA span over recent closes
    pub ema_span: usize,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            min_confidence: 60.0,
            ema_span: 20,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct MomentumInput {
    pub trend: Trend,
    pub confidence: f64,
    pub last_close: Price,
    pub ema: Price,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MomentumDecision {
    pub signal: Signal,
    pub reason: MomentumReason,
}

/// Forecast direction confirmed by price on the same side of the EMA
pub fn momentum_decision(input: MomentumInput, params: MomentumParams) -> MomentumDecision {
    let hold = |reason| MomentumDecision {
        signal: Signal::Hold,
        reason,
    };

    if !input.trend.is_up_family() && !input.trend.is_down_family() {
        return hold(MomentumReason::NoTrend);
    }

    if input.confidence < params.min_confidence {
        return hold(MomentumReason::LowConfidence);
    }

    if input.trend.is_up_family() && input.last_close.0 > input.ema.0 {
        return MomentumDecision {
            signal: Signal::Buy,
            reason: MomentumReason::TrendUpAboveEma,
        };
    }

    if input.trend.is_down_family() && input.last_close.0 < input.ema.0 {
        return MomentumDecision {
            signal: Signal::Sell,
            reason: MomentumReason::TrendDownBelowEma,
        };
    }

    hold(MomentumReason::PriceDisagrees)
}
