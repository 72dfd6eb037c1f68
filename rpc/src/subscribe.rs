//! Websocket subscription to `NewBlock` events.
//!
//! A reader task owns the socket and forwards block heights into a bounded
//! channel. The channel closes when the socket does, or when the node answers
//! the subscribe request with an error, so the consumer sees end of stream
//! instead of silence.

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::{NewBlock, RpcError};

pub const BLOCK_CHANNEL_CAPACITY: usize = 100;

const NEW_BLOCK_QUERY: &str = "tm.event='NewBlock'";

#[derive(Deserialize)]
struct EventMessage {
    #[serde(default)]
    result: Option<EventResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct EventResult {
    #[serde(default)]
    data: Option<EventData>,
}

#[derive(Deserialize)]
struct EventData {
    value: EventValue,
}

#[derive(Deserialize)]
struct EventValue {
    block: Block,
}

#[derive(Deserialize)]
struct Block {
    header: Header,
}

#[derive(Deserialize)]
struct Header {
    height: String,
}

/// Connect to the node's websocket endpoint (e.g. `ws://127.0.0.1:26657/websocket`)
/// and subscribe to new blocks.
pub async fn subscribe_new_blocks(ws_url: &str) -> Result<mpsc::Receiver<NewBlock>, RpcError> {
    let (socket, _) = connect_async(ws_url).await?;
    let (mut sink, mut stream) = socket.split();

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 0,
        "method": "subscribe",
        "params": { "query": NEW_BLOCK_QUERY },
    });
    sink.send(Message::Text(request.to_string())).await?;
    info!(url = ws_url, "subscribed to new blocks");

    let (tx, rx) = mpsc::channel(BLOCK_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            let frame = match frame {
                Ok(f) => f,
                Err(e) => {
                    error!("websocket read failed: {e}");
                    break;
                }
            };

            match frame {
                Message::Text(text) => match parse_new_block(&text) {
                    Ok(Some(block)) => {
                        if tx.send(block).await.is_err() {
                            debug!("block receiver dropped");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(RpcError::Subscription(reason)) => {
                        error!(%reason, "node rejected the block subscription");
                        break;
                    }
                    Err(e) => warn!("ignoring websocket message: {e}"),
                },
                Message::Ping(data) => {
                    if sink.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => {
                    info!("node closed the block subscription");
                    break;
                }
                _ => {}
            }
        }
    });

    Ok(rx)
}

/// Extract the block from a subscription message. The subscribe
/// acknowledgement and other non-block events yield `None`.
pub fn parse_new_block(text: &str) -> Result<Option<NewBlock>, RpcError> {
    let message: EventMessage =
        serde_json::from_str(text).map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

    if let Some(err) = message.error {
        let reason = err
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(RpcError::Subscription(reason));
    }

    let Some(data) = message.result.and_then(|r| r.data) else {
        return Ok(None);
    };
    let height = data
        .value
        .block
        .header
        .height
        .parse()
        .map_err(|e| RpcError::InvalidResponse(format!("bad block height: {e}")))?;
    Ok(Some(NewBlock { height }))
}
