#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("market data request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("market data endpoint returned status {0}")]
    Status(u16),
    #[error("market data rejected request: {code}: {description}")]
    Rejected { code: String, description: String },
    #[error("malformed market data payload: {0}")]
    Malformed(String),
}
