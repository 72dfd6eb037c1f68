//! RPC error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("node returned HTTP {0}")]
    Http(u16),

    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    #[error("query {path} failed with code {code}: {log}")]
    Query { path: String, code: u32, log: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("websocket error: {0}")]
    WebSocket(String),

    #[error("subscription rejected: {0}")]
    Subscription(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => RpcError::Http(status.as_u16()),
            None => RpcError::Transport(e.to_string()),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for RpcError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        RpcError::WebSocket(e.to_string())
    }
}
