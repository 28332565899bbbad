use std::fmt::Display;
use std::pin::pin;
use std::time::Duration;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use marketdata::synthetic::{DEFAULT_START_PRICE, PriceWalk};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use trade_core::types::{Price, TimestampMs};

use crate::AppState;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RealtimeParams {
    pub tick_interval: Duration,
    pub start_price: Price,
    /// Largest price move between two ticks
    pub max_step: f64,
}

impl Default for RealtimeParams {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            start_price: DEFAULT_START_PRICE,
            max_step: 50.0,
        }
    }
}

pub async fn realtime(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let params = state.realtime;
    ws.on_upgrade(move |socket| stream_ticks(socket, params))
}

async fn stream_ticks(socket: WebSocket, params: RealtimeParams) {
    info!("websocket client connected");
    let (sender, receiver) = socket.split();
    let end = tick_loop(sender, receiver, params).await;
    info!(reason = ?end, "websocket session finished");
}

/// Why a tick session stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SessionEnd {
    ClientClosed,
    SendFailed,
    ReadFailed,
    EncodeFailed,
}

/// Pushes one `{ts, price}` tick per interval until the client goes away.
///
/// No backpressure: a tick is sent whether or not the previous one was read.
async fn tick_loop<Tx, Rx, E>(sender: Tx, receiver: Rx, params: RealtimeParams) -> SessionEnd
where
    Tx: Sink<Message>,
    Tx::Error: Display,
    Rx: Stream<Item = Result<Message, E>>,
    E: Display,
{
    let mut sender = pin!(sender);
    let mut receiver = pin!(receiver);
    let mut walk = PriceWalk::new(params.start_price, params.max_step);
    let mut rng = StdRng::from_entropy();
    let mut ticker = tokio::time::interval(params.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let end = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = TimestampMs(chrono::Utc::now().timestamp_millis());
                let tick = walk.next_tick(&mut rng, now);
                let text = match serde_json::to_string(&tick) {
                    Ok(t) => t,
                    Err(e) => {
                        error!(error = %e, "failed to encode tick");
                        break SessionEnd::EncodeFailed;
                    }
                };
                if let Err(e) = sender.send(Message::Text(text.into())).await {
                    info!(error = %e, "websocket client disconnected");
                    break SessionEnd::SendFailed;
                }
            }
            msg = receiver.next() => match msg {
                None | Some(Ok(Message::Close(_))) => {
                    info!("websocket client disconnected");
                    break SessionEnd::ClientClosed;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "websocket error");
                    break SessionEnd::ReadFailed;
                }
                // inbound frames are ignored
                Some(Ok(_)) => {}
            }
        }
    };

    let _ = sender.close().await;
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{sink, stream};
    use std::convert::Infallible;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn fast() -> RealtimeParams {
        RealtimeParams {
            tick_interval: Duration::from_millis(10),
            ..RealtimeParams::default()
        }
    }

    /// Client side of a session: inbound frames we push, outbound ticks we read.
    fn client() -> (
        mpsc::UnboundedSender<Result<Message, Infallible>>,
        impl Stream<Item = Result<Message, Infallible>> + Send + 'static,
        mpsc::UnboundedReceiver<Message>,
        impl Sink<Message, Error = Infallible> + Send + 'static,
    ) {
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let inbound = stream::unfold(in_rx, |mut rx| async move {
            rx.recv().await.map(|m| (m, rx))
        });
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let outbound = sink::unfold(out_tx, |tx: mpsc::UnboundedSender<Message>, msg: Message| async move {
            let _ = tx.send(msg);
            Ok::<_, Infallible>(tx)
        });
        (in_tx, inbound, out_rx, outbound)
    }

    #[tokio::test]
    async fn session_ends_on_close_frame() {
        let (in_tx, inbound, mut out_rx, outbound) = client();
        let session = tokio::spawn(tick_loop(outbound, inbound, fast()));

        let first = timeout(WAIT, out_rx.recv()).await.unwrap().unwrap();
        let Message::Text(text) = first else {
            panic!("expected a text tick");
        };
        let tick: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert!(tick["price"].is_number());

        in_tx.send(Ok(Message::Close(None))).unwrap();
        let end = timeout(WAIT, session).await.unwrap().unwrap();
        assert_eq!(end, SessionEnd::ClientClosed);
    }

    #[tokio::test]
    async fn session_ends_when_client_stream_drops() {
        let (in_tx, inbound, mut out_rx, outbound) = client();
        let session = tokio::spawn(tick_loop(outbound, inbound, fast()));

        timeout(WAIT, out_rx.recv()).await.unwrap().unwrap();
        drop(in_tx);
        let end = timeout(WAIT, session).await.unwrap().unwrap();
        assert_eq!(end, SessionEnd::ClientClosed);
    }

    #[tokio::test]
    async fn session_ends_when_send_fails() {
        let (_in_tx, inbound, _out_rx, _) = client();
        let broken = sink::unfold((), |(), _msg: Message| async { Err::<(), _>("connection reset") });
        let end = timeout(WAIT, tick_loop(broken, inbound, fast())).await.unwrap();
        assert_eq!(end, SessionEnd::SendFailed);
    }
}
