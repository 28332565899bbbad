pub mod error;
pub mod historical;
pub mod report;
pub mod strategy;

pub use error::EngineError;
pub use report::StrategyReport;
pub use strategy::{EngineParams, StrategyEngine, StrategyKind};
