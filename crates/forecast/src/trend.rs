use serde::{Deserialize, Serialize};

use crate::model::PredictionPoint;

/// Guard for the slope denominator
const DENOM_FLOOR: f64 = 1e-8;

/// Direction bucket of a forecast slope
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    StrongUp,
    Up,
    Flat,
    Down,
    StrongDown,
    NotAvailable,
}

impl Trend {
    /// STRONG_UP or UP
    pub fn is_up_family(self) -> bool {
        matches!(self, Trend::StrongUp | Trend::Up)
    }

    /// STRONG_DOWN or DOWN
    pub fn is_down_family(self) -> bool {
        matches!(self, Trend::StrongDown | Trend::Down)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    pub slope: f64,
}

impl TrendResult {
    pub const NOT_AVAILABLE: TrendResult = TrendResult {
        trend: Trend::NotAvailable,
        slope: 0.0,
    };
}

/// Slope cutoffs, symmetric around zero.
///
/// `|slope| > strong` is a strong trend, `weak < |slope| <= strong` a plain one,
/// anything within `[-weak, weak]` is flat.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrendThresholds {
    pub strong: f64,
    pub weak: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            strong: 0.5,
            weak: 0.1,
        }
    }
}

impl TrendThresholds {
    pub fn classify(&self, slope: f64) -> Trend {
        if slope > self.strong {
            Trend::StrongUp
        } else if slope > self.weak {
            Trend::Up
        } else if slope < -self.strong {
            Trend::StrongDown
        } else if slope < -self.weak {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

/// Least-squares slope of `values[i]` against `i`.
///
/// `None` for fewer than two values or any non-finite input.
pub fn least_squares_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let n = values.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;

    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denom = (n * sum_x2 - sum_x * sum_x).max(DENOM_FLOOR);
    let slope = (n * sum_xy - sum_x * sum_y) / denom;

    slope.is_finite().then_some(slope)
}

/// Fits and classifies the forecast trend. Pure: same points, same result.
pub fn slope_trend(points: &[PredictionPoint], thresholds: TrendThresholds) -> TrendResult {
    let values: Vec<f64> = points.iter().map(|p| p.yhat).collect();

    match least_squares_slope(&values) {
        Some(slope) => TrendResult {
            trend: thresholds.classify(slope),
            slope,
        },
        None => TrendResult::NOT_AVAILABLE,
    }
}
