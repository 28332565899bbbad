pub mod error;
pub mod rest;
pub mod source;
pub mod synthetic;

pub use error::MarketDataError;
pub use rest::YahooChart;
pub use source::{BarSource, StaticBars};
pub use synthetic::{PriceTick, PriceWalk, synthetic_candles};
