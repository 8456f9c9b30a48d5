use crate::error::UpstreamError;
use crate::upstream::{Connector, QueryChannel};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Connects to Tendermint RPC endpoints over HTTP.
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, host: &str) -> Result<Box<dyn QueryChannel>, UpstreamError> {
        let rpc_url = Url::parse(host)
            .map_err(|err| UpstreamError::Connection(format!("invalid host {}: {}", host, err)))?;
        let client = Client::builder()
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(|err| UpstreamError::Connection(err.to_string()))?;

        Ok(Box::new(TendermintChannel::new(client, rpc_url)))
    }
}

/// `abci_query` over JSON-RPC.
pub struct TendermintChannel {
    client: Client,
    rpc_url: Url,
    next_id: AtomicU64,
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

impl TendermintChannel {
    pub fn new(client: Client, rpc_url: Url) -> Self {
        Self {
            client,
            rpc_url,
            next_id: AtomicU64::new(0),
        }
    }

    async fn request_rpc(&self, body: &Value) -> Result<Value, UpstreamError> {
        let result = self
            .client
            .post(self.rpc_url.clone())
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl QueryChannel for TendermintChannel {
    async fn query(&self, path: &str, data: Vec<u8>) -> Result<Vec<u8>, UpstreamError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "abci_query",
            "params": {
                "path": path,
                "data": hex::encode_upper(data),
                "height": "0",
                "prove": false,
            },
        });

        let mut response = self.request_rpc(&body).await?;

        let error = response["error"].take();
        if !error.is_null() {
            return Err(UpstreamError::Query {
                path: path.to_string(),
                message: error.to_string(),
            });
        }

        decode_abci_result(path, response["result"].take())
    }
}

fn decode_abci_result(path: &str, result: Value) -> Result<Vec<u8>, UpstreamError> {
    let result = serde_json::from_value::<AbciQueryResult>(result)
        .map_err(|err| UpstreamError::Malformed(err.to_string()))?;

    if result.response.code != 0 {
        return Err(UpstreamError::Query {
            path: path.to_string(),
            message: format!("code {}: {}", result.response.code, result.response.log),
        });
    }

    match result.response.value {
        Some(value) => STANDARD
            .decode(value)
            .map_err(|err| UpstreamError::Malformed(err.to_string())),
        None => Ok(Vec::new()),
    }
}
