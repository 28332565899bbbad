use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use engine::EngineParams;
use forecast::TrendThresholds;
use marketdata::rest::DEFAULT_BASE_URL;
use policy::breakout_policy::BreakoutParams;
use policy::consensus_policy::ConsensusParams;
use policy::momentum_policy::MomentumParams;
use trade_core::types::Price;

use crate::realtime::RealtimeParams;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub market_data_url: String,
    pub engine: EngineParams,
    pub realtime: RealtimeParams,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.parse().context("invalid BIND_ADDR")?;
        let market_data_url =
            get("MARKET_DATA_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let trend_defaults = TrendThresholds::default();
        let trend = TrendThresholds {
            strong: parse_or(&get, "TREND_STRONG_SLOPE", trend_defaults.strong)?,
            weak: parse_or(&get, "TREND_WEAK_SLOPE", trend_defaults.weak)?,
        };
        if !(trend.strong.is_finite() && trend.weak >= 0.0 && trend.strong >= trend.weak) {
            bail!("TREND_WEAK_SLOPE must be >= 0 and <= TREND_STRONG_SLOPE");
        }

        let momentum_defaults = MomentumParams::default();
        let momentum = MomentumParams {
            min_confidence: parse_or(&get, "MOMENTUM_MIN_CONFIDENCE", momentum_defaults.min_confidence)?,
            ema_span: parse_or(&get, "MOMENTUM_EMA_SPAN", momentum_defaults.ema_span)?,
        };
        check_gate("MOMENTUM_MIN_CONFIDENCE", momentum.min_confidence)?;

        let breakout_defaults = BreakoutParams::default();
        let breakout = BreakoutParams {
            min_confidence: parse_or(&get, "BREAKOUT_MIN_CONFIDENCE", breakout_defaults.min_confidence)?,
            window: parse_or(&get, "BREAKOUT_WINDOW", breakout_defaults.window)?,
        };
        check_gate("BREAKOUT_MIN_CONFIDENCE", breakout.min_confidence)?;
        if breakout.window == 0 {
            bail!("BREAKOUT_WINDOW must be > 0");
        }

        let consensus = ConsensusParams {
            min_votes: parse_or(&get, "CONSENSUS_MIN_VOTES", ConsensusParams::default().min_votes)?,
        };

        let realtime_defaults = RealtimeParams::default();
        let tick_ms: u64 = parse_or(
            &get,
            "REALTIME_TICK_MS",
            realtime_defaults.tick_interval.as_millis() as u64,
        )?;
        if tick_ms == 0 {
            bail!("REALTIME_TICK_MS must be > 0");
        }
        let start_price: f64 =
            parse_or(&get, "REALTIME_START_PRICE", realtime_defaults.start_price.0)?;
        if !(start_price.is_finite() && start_price > 0.0) {
            bail!("REALTIME_START_PRICE must be a finite price > 0, got {}", start_price);
        }
        let realtime = RealtimeParams {
            tick_interval: Duration::from_millis(tick_ms),
            start_price: Price(start_price),
            max_step: realtime_defaults.max_step,
        };

        Ok(Self {
            bind_addr,
            market_data_url,
            engine: EngineParams {
                trend,
                momentum,
                breakout,
                consensus,
            },
            realtime,
        })
    }
}

/// Confidence gates are percentages; NaN would make every comparison false
/// and silently open the gate.
fn check_gate(key: &str, value: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        bail!("{} must be within 0..=100, got {}", key, value);
    }
    Ok(())
}

fn parse_or<T, F>(get: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}='{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ApiConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_match_rule_constants() {
        let c = config(&[]).unwrap();
        assert_eq!(c.bind_addr.port(), 5000);
        assert_eq!(c.market_data_url, DEFAULT_BASE_URL);
        assert_eq!(c.engine, EngineParams::default());
        assert_eq!(c.engine.momentum.min_confidence, 60.0);
        assert_eq!(c.engine.breakout.min_confidence, 70.0);
        assert_eq!(c.engine.breakout.window, 14);
        assert_eq!(c.engine.consensus.min_votes, 3);
        assert_eq!(c.realtime.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn overrides_are_applied() {
        let c = config(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("MOMENTUM_MIN_CONFIDENCE", "55.5"),
            ("BREAKOUT_WINDOW", "20"),
            ("TREND_STRONG_SLOPE", "1.0"),
            ("REALTIME_TICK_MS", "250"),
        ])
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.engine.momentum.min_confidence, 55.5);
        assert_eq!(c.engine.breakout.window, 20);
        assert_eq!(c.engine.trend.strong, 1.0);
        assert_eq!(c.realtime.tick_interval, Duration::from_millis(250));
    }

    #[test]
    fn garbage_names_the_variable() {
        let err = config(&[("CONSENSUS_MIN_VOTES", "three")]).unwrap_err();
        assert!(err.to_string().contains("CONSENSUS_MIN_VOTES"));
    }

    #[test]
    fn rejects_inverted_slope_thresholds() {
        assert!(config(&[("TREND_WEAK_SLOPE", "0.9")]).is_err());
    }

    #[test]
    fn rejects_zero_tick() {
        assert!(config(&[("REALTIME_TICK_MS", "0")]).is_err());
    }

    #[test]
    fn rejects_nan_confidence_gate() {
        let err = config(&[("MOMENTUM_MIN_CONFIDENCE", "NaN")]).unwrap_err();
        assert!(err.to_string().contains("MOMENTUM_MIN_CONFIDENCE"));
    }

    #[test]
    fn rejects_gate_outside_percent_range() {
        let err = config(&[("BREAKOUT_MIN_CONFIDENCE", "150")]).unwrap_err();
        assert!(err.to_string().contains("BREAKOUT_MIN_CONFIDENCE"));
        assert!(config(&[("MOMENTUM_MIN_CONFIDENCE", "-1")]).is_err());
        assert!(config(&[("MOMENTUM_MIN_CONFIDENCE", "100")]).is_ok());
    }

    #[test]
    fn rejects_non_finite_start_price() {
        for raw in ["inf", "NaN", "0"] {
            let err = config(&[("REALTIME_START_PRICE", raw)]).unwrap_err();
            assert!(err.to_string().contains("REALTIME_START_PRICE"), "{raw}");
        }
    }

    #[test]
    fn rejects_infinite_strong_slope() {
        assert!(config(&[("TREND_STRONG_SLOPE", "inf")]).is_err());
    }
}
