//! HTTP JSON-RPC client for a Tendermint node.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use feeder_types::{AccAddress, Account, OracleParams};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::{BroadcastResponse, OracleQuerier, RpcError, TxBroadcaster};

// Route names registered by the Terra oracle querier (`x/oracle/querier.go`:
// `QueryParams = "params"`, `QueryActive = "active"`) and the auth querier
// (`auth.StoreKey = "acc"`, `auth.QueryAccount = "account"`).
pub const PARAMS_PATH: &str = "custom/oracle/params";
pub const ACTIVES_PATH: &str = "custom/oracle/active";
pub const ACCOUNT_PATH: &str = "custom/acc/account";

/// Tendermint RPC client over HTTP.
#[derive(Clone)]
pub struct TendermintClient {
    http: reqwest::Client,
    rpc_url: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorBody>,
}

#[derive(Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Deserialize)]
struct AbciQueryResult {
    response: AbciResponse,
}

#[derive(Deserialize)]
struct AbciResponse {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    log: String,
    #[serde(default)]
    value: Option<String>,
}

/// `custom/acc/account` answers either with the bare account or with an
/// amino `{"type": ..., "value": ...}` wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum AccountResponse {
    Wrapped { value: Account },
    Bare(Account),
}

impl TendermintClient {
    /// Create a client targeting the node's RPC endpoint (e.g. `http://127.0.0.1:26657`).
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            rpc_url: rpc_url.into(),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Send a JSON-RPC request and return its `result`.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self.http.post(&self.rpc_url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let json: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("invalid JSON-RPC body: {e}")))?;
        into_result(json)
    }

    /// Run an ABCI query and return the decoded `response.value` bytes.
    async fn abci_query(&self, path: &str, data: &[u8]) -> Result<Vec<u8>, RpcError> {
        let result = self
            .rpc_call(
                "abci_query",
                serde_json::json!({ "path": path, "data": hex::encode(data) }),
            )
            .await?;
        decode_query_value(path, result)
    }

    async fn query_json<T: DeserializeOwned>(&self, path: &str, data: &[u8]) -> Result<T, RpcError> {
        let bytes = self.abci_query(path, data).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RpcError::InvalidResponse(format!("{path}: {e}")))
    }
}

fn into_result(response: JsonRpcResponse) -> Result<serde_json::Value, RpcError> {
    if let Some(err) = response.error {
        let message = match err.data {
            Some(data) if !data.is_empty() => format!("{} ({data})", err.message),
            _ => err.message,
        };
        return Err(RpcError::JsonRpc {
            code: err.code,
            message,
        });
    }
    response
        .result
        .ok_or_else(|| RpcError::InvalidResponse("missing result".into()))
}

/// Extract and base64-decode the value of an `abci_query` result. A missing
/// value decodes to an empty buffer.
pub fn decode_query_value(path: &str, result: serde_json::Value) -> Result<Vec<u8>, RpcError> {
    let result: AbciQueryResult = serde_json::from_value(result)
        .map_err(|e| RpcError::InvalidResponse(format!("{path}: {e}")))?;
    let response = result.response;
    if response.code != 0 {
        return Err(RpcError::Query {
            path: path.to_string(),
            code: response.code,
            log: response.log,
        });
    }
    match response.value {
        Some(value) if !value.is_empty() => BASE64
            .decode(value)
            .map_err(|e| RpcError::InvalidResponse(format!("{path}: bad base64: {e}"))),
        _ => Ok(Vec::new()),
    }
}

/// Decode the active denom list; an empty or `null` answer means none.
pub fn parse_active_denoms(bytes: &[u8]) -> Result<Vec<String>, RpcError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let denoms: Option<Vec<String>> = serde_json::from_slice(bytes)
        .map_err(|e| RpcError::InvalidResponse(format!("{ACTIVES_PATH}: {e}")))?;
    Ok(denoms.unwrap_or_default())
}

pub fn parse_account(bytes: &[u8]) -> Result<Account, RpcError> {
    let response: AccountResponse = serde_json::from_slice(bytes)
        .map_err(|e| RpcError::InvalidResponse(format!("{ACCOUNT_PATH}: {e}")))?;
    Ok(match response {
        AccountResponse::Wrapped { value } => value,
        AccountResponse::Bare(account) => account,
    })
}

#[async_trait]
impl OracleQuerier for TendermintClient {
    async fn oracle_params(&self) -> Result<OracleParams, RpcError> {
        self.query_json(PARAMS_PATH, &[]).await
    }

    async fn active_denoms(&self) -> Result<Vec<String>, RpcError> {
        let bytes = self.abci_query(ACTIVES_PATH, &[]).await?;
        parse_active_denoms(&bytes)
    }

    async fn account(&self, address: &AccAddress) -> Result<Account, RpcError> {
        let data = serde_json::to_vec(&serde_json::json!({ "Address": address.as_str() }))
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
        let bytes = self.abci_query(ACCOUNT_PATH, &data).await?;
        parse_account(&bytes)
    }
}

#[async_trait]
impl TxBroadcaster for TendermintClient {
    async fn broadcast_tx_sync(&self, tx: Vec<u8>) -> Result<BroadcastResponse, RpcError> {
        let result = self
            .rpc_call(
                "broadcast_tx_sync",
                serde_json::json!({ "tx": BASE64.encode(&tx) }),
            )
            .await?;
        let response: BroadcastResponse = serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("broadcast_tx_sync: {e}")))?;
        tracing::debug!(code = response.code, hash = %response.hash, "broadcast_tx_sync");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn query_result(value: &[u8]) -> serde_json::Value {
        json!({ "response": { "code": 0, "log": "", "value": BASE64.encode(value) } })
    }

    #[test]
    fn decodes_base64_query_value() {
        let bytes = decode_query_value(PARAMS_PATH, query_result(br#"{"vote_period":"5"}"#)).unwrap();
        let params: OracleParams = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(params.vote_period.get(), 5);
    }

    #[test]
    fn non_zero_query_code_is_an_error() {
        let result = json!({ "response": { "code": 6, "log": "unknown request" } });
        match decode_query_value(ACTIVES_PATH, result) {
            Err(RpcError::Query { code, log, .. }) => {
                assert_eq!(code, 6);
                assert_eq!(log, "unknown request");
            }
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[test]
    fn missing_value_means_empty() {
        let bytes = decode_query_value(ACTIVES_PATH, json!({ "response": { "code": 0 } })).unwrap();
        assert!(parse_active_denoms(&bytes).unwrap().is_empty());
        assert!(parse_active_denoms(b"null").unwrap().is_empty());
        assert_eq!(
            parse_active_denoms(br#"["ukrw","uusd"]"#).unwrap(),
            vec!["ukrw".to_string(), "uusd".to_string()]
        );
    }

    #[test]
    fn parses_wrapped_and_bare_accounts() {
        let wrapped = br#"{"type":"auth/Account","value":{"address":"terra1x","account_number":"4","sequence":"9"}}"#;
        let bare = br#"{"account_number":"4","sequence":"9"}"#;
        let expected = Account {
            account_number: 4,
            sequence: 9,
        };
        assert_eq!(parse_account(wrapped).unwrap(), expected);
        assert_eq!(parse_account(bare).unwrap(), expected);
    }

    #[test]
    fn json_rpc_error_is_surfaced() {
        let response: JsonRpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32603, "message": "Internal error", "data": "tx already exists in cache" }
        }))
        .unwrap();
        match into_result(response) {
            Err(RpcError::JsonRpc { code, message }) => {
                assert_eq!(code, -32603);
                assert!(message.contains("tx already exists"));
            }
            other => panic!("expected JSON-RPC error, got {other:?}"),
        }
    }

    /// Answer one HTTP request with `body` and hand back the raw request.
    async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = vec![0u8; 4096];
            // Read until the JSON body is complete.
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.ends_with(b"}") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{addr}"), server)
    }

    #[tokio::test]
    async fn broadcast_posts_base64_tx() {
        let (url, server) = serve_once(
            r#"{"jsonrpc":"2.0","id":1,"result":{"code":0,"data":"","log":"[]","hash":"AB12"}}"#,
        )
        .await;

        let client = TendermintClient::new(url).unwrap();
        let response = client.broadcast_tx_sync(b"tx-bytes".to_vec()).await.unwrap();
        assert!(response.is_ok());
        assert_eq!(response.hash, "AB12");

        let request = server.await.unwrap();
        assert!(request.contains("broadcast_tx_sync"));
        assert!(request.contains(&BASE64.encode(b"tx-bytes")));
    }

    #[tokio::test]
    async fn params_are_queried_on_the_oracle_params_route() {
        // value = base64(`{"vote_period":"12"}`)
        let (url, server) = serve_once(
            r#"{"jsonrpc":"2.0","id":1,"result":{"response":{"code":0,"log":"","value":"eyJ2b3RlX3BlcmlvZCI6IjEyIn0="}}}"#,
        )
        .await;

        let client = TendermintClient::new(url).unwrap();
        let params = client.oracle_params().await.unwrap();
        assert_eq!(params.vote_period.get(), 12);

        let request = server.await.unwrap();
        assert!(request.contains(r#""path":"custom/oracle/params""#));
        assert!(request.contains("abci_query"));
    }

    #[tokio::test]
    async fn actives_are_queried_on_the_oracle_active_route() {
        // value = base64(`["ukrw"]`)
        let (url, server) = serve_once(
            r#"{"jsonrpc":"2.0","id":1,"result":{"response":{"code":0,"log":"","value":"WyJ1a3J3Il0="}}}"#,
        )
        .await;

        let client = TendermintClient::new(url).unwrap();
        assert_eq!(client.active_denoms().await.unwrap(), vec!["ukrw".to_string()]);
        assert!(server.await.unwrap().contains(r#""path":"custom/oracle/active""#));
    }
}
