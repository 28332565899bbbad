pub mod model;
pub mod trend;

pub use model::{ModelError, ModelKind, ModelOutput, ModelSet, PredictionPoint, Predictor, StubPredictor};
pub use trend::{Trend, TrendResult, TrendThresholds, slope_trend};
