#![allow(dead_code)]

use std::sync::Arc;

use api::{AppState, realtime::RealtimeParams, router};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use engine::{EngineParams, StrategyEngine};
use forecast::ModelSet;
use http_body_util::BodyExt;
use marketdata::StaticBars;
use serde_json::Value;
use structure::Candle;
use tower::ServiceExt;
use trade_core::types::{Price, Qty, TimestampMs};

pub fn state_with(bars: Vec<Candle>, realtime: RealtimeParams) -> AppState {
    let engine = StrategyEngine::new(
        Arc::new(StaticBars::new(bars)),
        ModelSet::placeholders(),
        EngineParams::default(),
    );
    AppState {
        engine: Arc::new(engine),
        realtime,
    }
}

pub fn app(bars: Vec<Candle>) -> Router {
    router(state_with(bars, RealtimeParams::default()))
}

pub fn hourly(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle {
            ts: TimestampMs(1_700_000_000_000 + i as i64 * 3_600_000),
            open: Price(c),
            high: Price(c + 1.0),
            low: Price(c - 1.0),
            close: Price(c),
            volume: Qty(2.0),
        })
        .collect()
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
