use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use engine::StrategyReport;
use forecast::ModelOutput;
use serde::Deserialize;
use serde_json::json;
use structure::Candle;

use crate::AppState;
use crate::error::ApiError;

const DEFAULT_SYMBOL: &str = "BTC-USD";
const DEFAULT_HOURS: i64 = 24;

pub async fn health() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    symbol: Option<String>,
    hours: Option<i64>,
}

pub async fn historical(
    State(state): State<AppState>,
    query: Result<Query<HistoricalQuery>, QueryRejection>,
) -> Result<Json<Vec<Candle>>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let symbol = q.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL);
    let hours = q.hours.unwrap_or(DEFAULT_HOURS);

    let candles = state.engine.historical(symbol, hours).await?;
    Ok(Json(candles))
}

#[derive(Debug, Deserialize)]
pub struct StrategyQuery {
    symbol: Option<String>,
    window: Option<i64>,
}

pub async fn strategy(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<StrategyQuery>, QueryRejection>,
) -> Result<Json<StrategyReport>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let symbol = q.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL);

    let report = state.engine.run(&name, symbol, q.window).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    symbol: Option<String>,
}

pub async fn predict(
    State(state): State<AppState>,
    Path(model): Path<String>,
    query: Result<Query<SymbolQuery>, QueryRejection>,
) -> Result<Json<ModelOutput>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let symbol = q.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL);
    let output = state.engine.predict(&model, symbol)?;
    Ok(Json(output))
}
