pub mod candle;
pub mod ema;
pub mod range;

pub use candle::{Candle, Timeframe};
pub use range::{PriceRange, prior_range};
