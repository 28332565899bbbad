use std::sync::Arc;

use anyhow::{Context, Result};
use api::{AppState, config::ApiConfig, router};
use engine::StrategyEngine;
use forecast::ModelSet;
use marketdata::YahooChart;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,engine=info,tower_http=info".into()),
        )
        .init();

    let config = ApiConfig::from_env()?;

    let bars = YahooChart::new(config.market_data_url.as_str())
        .context("failed to build market data client")?;
    let engine = StrategyEngine::new(Arc::new(bars), ModelSet::placeholders(), config.engine);

    let state = AppState {
        engine: Arc::new(engine),
        realtime: config.realtime,
    };
    let app = router(state);

    info!("api listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
