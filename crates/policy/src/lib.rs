pub mod breakout_policy;
pub mod consensus_policy;
pub mod momentum_policy;
pub mod signal;

pub use signal::Signal;
