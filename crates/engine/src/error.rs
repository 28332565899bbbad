use forecast::ModelError;
use marketdata::MarketDataError;

/// Every way a request into the engine can fail. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("hours must be between 1 and {max}, got {got}")]
    InvalidHours { got: i64, max: i64 },
    #[error("window must be between 1 and {max}, got {got}")]
    InvalidWindow { got: i64, max: i64 },
    #[error("Unknown strategy '{0}'. Valid: momentum, breakout, ensemble_confirm")]
    UnknownStrategy(String),
    #[error("No price data for {strategy} strategy")]
    NoData { strategy: &'static str },
    #[error("Not enough data for {strategy} calculation: need {needed} bars, got {got}")]
    InsufficientData {
        strategy: &'static str,
        needed: usize,
        got: usize,
    },
    #[error(transparent)]
    Upstream(#[from] MarketDataError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
