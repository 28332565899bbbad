use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use engine::{EngineParams, StrategyEngine};
use forecast::ModelSet;
use marketdata::rest::DEFAULT_BASE_URL;
use marketdata::synthetic::{DEFAULT_START_PRICE, synthetic_candles};
use marketdata::{BarSource, StaticBars, YahooChart};
use structure::candle::Timeframe;
use trade_core::types::TimestampMs;

/// Runs one strategy and prints its diagnostic JSON
#[derive(Parser, Debug)]
struct Args {
    /// momentum | breakout | ensemble_confirm
    strategy: String,
    #[arg(long, default_value = "BTC-USD")]
    symbol: String,
    /// Breakout lookback in bars
    #[arg(long)]
    window: Option<i64>,
    /// Use a synthetic hourly history instead of the network
    #[arg(long, default_value_t = false)]
    offline: bool,
    #[arg(long, default_value_t = 400)]
    offline_bars: usize,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engine=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let bars: Arc<dyn BarSource> = if args.offline {
        let mut rng = StdRng::from_entropy();
        let now = TimestampMs(chrono::Utc::now().timestamp_millis());
        Arc::new(StaticBars::new(synthetic_candles(
            &mut rng,
            args.offline_bars,
            now,
            Timeframe::Hour1.as_millis(),
            DEFAULT_START_PRICE,
        )))
    } else {
        Arc::new(YahooChart::new(args.base_url.as_str()).context("failed to build http client")?)
    };

    let engine = StrategyEngine::new(bars, ModelSet::placeholders(), EngineParams::default());
    let report = engine
        .run(&args.strategy, &args.symbol, args.window)
        .await
        .with_context(|| format!("strategy {} failed for {}", args.strategy, args.symbol))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
