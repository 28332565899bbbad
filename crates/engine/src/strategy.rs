use std::str::FromStr;
use std::sync::Arc;

use forecast::{ModelKind, ModelOutput, ModelSet, TrendThresholds, slope_trend};
use marketdata::BarSource;
use policy::breakout_policy::{BreakoutInput, BreakoutParams, breakout_decision};
use policy::consensus_policy::{ConsensusParams, consensus_decision};
use policy::momentum_policy::{MomentumInput, MomentumParams, momentum_decision};
use structure::candle::{Candle, Timeframe, closes};
use structure::ema::ema_last;
use structure::range::prior_range;
use tracing::{debug, info};
use trade_core::types::{TimestampMs, round_dp};

use crate::error::EngineError;
use crate::historical::historical_candles;
use crate::report::{BreakoutReport, ConsensusReport, MomentumReport, ModelVote, StrategyReport};

/// Hourly history the momentum EMA is computed over
const MOMENTUM_LOOKBACK_DAYS: u32 = 7;

/// Upper bound for a caller-supplied breakout window (bars)
pub const MAX_WINDOW: i64 = 1_000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StrategyKind {
    Momentum,
    Breakout,
    EnsembleConfirm,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Momentum => "momentum",
            StrategyKind::Breakout => "breakout",
            StrategyKind::EnsembleConfirm => "ensemble_confirm",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "momentum" => Ok(StrategyKind::Momentum),
            "breakout" => Ok(StrategyKind::Breakout),
            "ensemble_confirm" => Ok(StrategyKind::EnsembleConfirm),
            _ => Err(EngineError::UnknownStrategy(s.to_string())),
        }
    }
}

/// All tunables of the rules in one place
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct EngineParams {
    pub trend: TrendThresholds,
    pub momentum: MomentumParams,
    pub breakout: BreakoutParams,
    pub consensus: ConsensusParams,
}

/// Runs the signal rules against a bar source and a set of models.
///
/// Holds no mutable state; one instance serves every request.
pub struct StrategyEngine {
    bars: Arc<dyn BarSource>,
    models: ModelSet,
    params: EngineParams,
}

impl StrategyEngine {
    pub fn new(bars: Arc<dyn BarSource>, models: ModelSet, params: EngineParams) -> Self {
        Self {
            bars,
            models,
            params,
        }
    }

    /// Raw forecast of one model, by name
    pub fn predict(&self, model: &str, symbol: &str) -> Result<ModelOutput, EngineError> {
        let kind: ModelKind = model.parse()?;
        Ok(self.models.predict(kind, symbol)?)
    }

    pub async fn historical(&self, symbol: &str, hours: i64) -> Result<Vec<Candle>, EngineError> {
        let now = TimestampMs(chrono::Utc::now().timestamp_millis());
        historical_candles(self.bars.as_ref(), symbol, hours, now).await
    }

    /// Dispatches by strategy name; `window` only matters for breakout
    pub async fn run(
        &self,
        name: &str,
        symbol: &str,
        window: Option<i64>,
    ) -> Result<StrategyReport, EngineError> {
        let kind: StrategyKind = name.parse()?;
        debug!(strategy = kind.as_str(), symbol, ?window, "running strategy");
        let report = match kind {
            StrategyKind::Momentum => StrategyReport::Momentum(self.momentum(symbol).await?),
            StrategyKind::Breakout => StrategyReport::Breakout(self.breakout(symbol, window).await?),
            StrategyKind::EnsembleConfirm => StrategyReport::Consensus(self.consensus(symbol)?),
        };
        Ok(report)
    }

    /// Ensemble forecast confirmed by the last close against the EMA of hourly closes
    pub async fn momentum(&self, symbol: &str) -> Result<MomentumReport, EngineError> {
        const STRATEGY: &str = "momentum";
        let params = self.params.momentum;

        let output = self.models.predict(ModelKind::Ensemble, symbol)?;
        let bars = self
            .bars
            .fetch_bars(symbol, MOMENTUM_LOOKBACK_DAYS, Timeframe::Hour1)
            .await?;

        let (Some(last), Some(ema)) = (bars.last(), ema_last(closes(&bars), params.ema_span))
        else {
            return Err(EngineError::NoData { strategy: STRATEGY });
        };

        let trend = slope_trend(&output.predictions, self.params.trend);
        let decision = momentum_decision(
            MomentumInput {
                trend: trend.trend,
                confidence: output.confidence,
                last_close: last.close,
                ema,
            },
            params,
        );

        info!(
            symbol,
            last = %last.close,
            ema = %ema,
            signal = %decision.signal,
            reason = ?decision.reason,
            "momentum decision"
        );

        Ok(MomentumReport {
            strategy: "ai_momentum",
            symbol: symbol.to_string(),
            signal: decision.signal,
            direction: trend.trend,
            slope: trend.slope,
            confidence: output.confidence,
            ema20: ema,
            last_price: last.close,
            model_used: ModelKind::Ensemble,
        })
    }

    /// Prophet forecast confirmed by a close outside the prior `window`-bar range
    pub async fn breakout(
        &self,
        symbol: &str,
        window: Option<i64>,
    ) -> Result<BreakoutReport, EngineError> {
        const STRATEGY: &str = "breakout";
        let params = self.params.breakout;

        let window = window.unwrap_or(params.window as i64);
        if !(1..=MAX_WINDOW).contains(&window) {
            return Err(EngineError::InvalidWindow {
                got: window,
                max: MAX_WINDOW,
            });
        }
        let window = window as usize;

        let output = self.models.predict(ModelKind::Prophet, symbol)?;
        let days = (window.max(14) + 2) as u32;
        let bars = self.bars.fetch_bars(symbol, days, Timeframe::Hour1).await?;

        if bars.is_empty() {
            return Err(EngineError::NoData { strategy: STRATEGY });
        }

        let needed = window + 2;
        let insufficient = || EngineError::InsufficientData {
            strategy: STRATEGY,
            needed,
            got: bars.len(),
        };
        if bars.len() < needed {
            return Err(insufficient());
        }
        let (Some(range), Some(last)) = (prior_range(&bars, window), bars.last()) else {
            return Err(insufficient());
        };

        let trend = slope_trend(&output.predictions, self.params.trend);
        let decision = breakout_decision(
            BreakoutInput {
                trend: trend.trend,
                confidence: output.confidence,
                last_close: last.close,
                range,
            },
            params,
        );

        info!(
            symbol,
            window,
            last = %last.close,
            signal = %decision.signal,
            reason = ?decision.reason,
            "breakout decision"
        );

        Ok(BreakoutReport {
            strategy: "ai_volatility_breakout",
            symbol: symbol.to_string(),
            signal: decision.signal,
            direction: trend.trend,
            slope: trend.slope,
            confidence: output.confidence,
            recent_high: range.high,
            recent_low: range.low,
            last_price: last.close,
            model_used: ModelKind::Prophet,
            window,
        })
    }

    /// Vote across all models; needs no market data
    pub fn consensus(&self, symbol: &str) -> Result<ConsensusReport, EngineError> {
        let mut votes = Vec::with_capacity(ModelKind::ALL.len());
        for kind in ModelKind::ALL {
            let output = self.models.predict(kind, symbol)?;
            let trend = slope_trend(&output.predictions, self.params.trend);
            votes.push(ModelVote {
                model: kind,
                trend: trend.trend,
                confidence: output.confidence,
            });
        }

        let trends: Vec<_> = votes.iter().map(|v| v.trend).collect();
        let decision = consensus_decision(&trends, self.params.consensus);

        let avg_confidence =
            votes.iter().map(|v| v.confidence).sum::<f64>() / votes.len().max(1) as f64;

        info!(
            symbol,
            ups = decision.ups,
            downs = decision.downs,
            signal = %decision.signal,
            "consensus decision"
        );

        Ok(ConsensusReport {
            strategy: "ensemble_confirmation",
            symbol: symbol.to_string(),
            signal: decision.signal,
            avg_confidence: round_dp(avg_confidence, 2),
            model_results: votes,
        })
    }
}
