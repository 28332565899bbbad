//! Units shared by every crate in the workspace.
//!
//! Rule code takes `Price`, `Qty` and `TimestampMs` instead of raw numbers so
//! a close can't be passed where a volume is expected. Each wrapper serializes
//! as its inner number.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset price (e.g. BTC-USD)
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub f64);

/// Traded quantity of the base asset
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qty(pub f64);

/// Milliseconds since unix epoch
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampMs(pub i64);

//
// --- Helpers ----------------------------------------------------------------
//

impl Price {
    /// Rounds to `decimals` places (display/wire precision, not tick size)
    pub fn round_dp(self, decimals: u32) -> Price {
        Price(round_dp(self.0, decimals))
    }
}

impl Qty {
    pub fn round_dp(self, decimals: u32) -> Qty {
        Qty(round_dp(self.0, decimals))
    }
}

pub fn round_dp(x: f64, decimals: u32) -> f64 {
    let m = 10f64.powi(decimals as i32);
    (x * m).round() / m
}

//
// --- Display (for logs) -----------------------------------------------------
//

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
