mod common;

use std::time::Duration;

use api::{realtime::RealtimeParams, router};
use common::state_with;
use futures_util::StreamExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn streams_price_ticks() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let realtime = RealtimeParams {
        tick_interval: Duration::from_millis(20),
        ..RealtimeParams::default()
    };
    let app = router(state_with(vec![], realtime));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/realtime"))
        .await
        .unwrap();

    let mut ticks: Vec<Value> = Vec::new();
    while ticks.len() < 3 {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("tick within timeout")
            .expect("stream open")
            .expect("frame ok");
        if let Message::Text(text) = msg {
            ticks.push(serde_json::from_str(&text).unwrap());
        }
    }

    let ts: Vec<i64> = ticks.iter().map(|t| t["ts"].as_i64().unwrap()).collect();
    assert!(ts.windows(2).all(|w| w[1] >= w[0]));
    for t in &ticks {
        let price = t["price"].as_f64().unwrap();
        assert!((price - 67_000.0).abs() < 1_000.0);
    }

    ws.close(None).await.unwrap();
}
