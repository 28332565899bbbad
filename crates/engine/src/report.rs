//! Diagnostic payloads returned by the strategies. Field names are what the dashboard reads.

use forecast::{ModelKind, Trend};
use policy::Signal;
use serde::Serialize;
use trade_core::types::Price;

#[derive(Debug, Clone, Serialize)]
pub struct MomentumReport {
    pub strategy: &'static str,
    pub symbol: String,
    pub signal: Signal,
    pub direction: Trend,
    pub slope: f64,
    pub confidence: f64,
    pub ema20: Price,
    pub last_price: Price,
    pub model_used: ModelKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakoutReport {
    pub strategy: &'static str,
    pub symbol: String,
    pub signal: Signal,
    pub direction: Trend,
    pub slope: f64,
    pub confidence: f64,
    pub recent_high: Price,
    pub recent_low: Price,
    pub last_price: Price,
    pub model_used: ModelKind,
    pub window: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelVote {
    pub model: ModelKind,
    pub trend: Trend,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsensusReport {
    pub strategy: &'static str,
    pub symbol: String,
    pub signal: Signal,
    pub avg_confidence: f64,
    pub model_results: Vec<ModelVote>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StrategyReport {
    Momentum(MomentumReport),
    Breakout(BreakoutReport),
    Consensus(ConsensusReport),
}

impl StrategyReport {
    pub fn signal(&self) -> Signal {
        match self {
            StrategyReport::Momentum(r) => r.signal,
            StrategyReport::Breakout(r) => r.signal,
            StrategyReport::Consensus(r) => r.signal,
        }
    }
}
