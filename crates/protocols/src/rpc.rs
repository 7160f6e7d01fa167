//! JSON-RPC reader batching `eth_call` requests.

use crate::call::{Call, CallState, decode_hex_words};
use crate::error::ProtocolError;
use crate::reader::ChainReader;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the JSON-RPC reader.
#[derive(Debug, Clone)]
pub struct JsonRpcReaderConfig {
    /// RPC endpoint per chain id.
    pub endpoints: HashMap<u64, String>,
    /// Maximum calls per HTTP request.
    pub max_batch_size: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for JsonRpcReaderConfig {
    fn default() -> Self {
        Self {
            endpoints: HashMap::new(),
            max_batch_size: 100,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: usize,
    method: &'static str,
    params: (CallParams, &'static str),
}

#[derive(Debug, Serialize)]
struct CallParams {
    to: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    id: usize,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Reader that sends each batch as a single JSON-RPC batch request.
pub struct JsonRpcReader {
    client: reqwest::Client,
    config: JsonRpcReaderConfig,
}

impl JsonRpcReader {
    /// Creates a new reader.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: JsonRpcReaderConfig) -> Result<Self, ProtocolError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, chain_id: u64) -> Result<&str, ProtocolError> {
        self.config
            .endpoints
            .get(&chain_id)
            .map(String::as_str)
            .ok_or(ProtocolError::UnknownChain(chain_id))
    }

    async fn send_batch(&self, url: &str, calls: &[Call]) -> Result<Vec<CallState>, ProtocolError> {
        let requests: Vec<RpcRequest> = calls.iter().enumerate().map(|(id, c)| request(id, c)).collect();

        let responses: Vec<RpcResponse> = self
            .client
            .post(url)
            .json(&requests)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(calls = calls.len(), responses = responses.len(), "eth_call batch completed");
        Ok(match_responses(calls.len(), responses))
    }
}

fn request(id: usize, call: &Call) -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        id,
        method: "eth_call",
        params: (
            CallParams {
                to: call.contract.to_lowercase_hex(),
                data: call.call.encode_hex(),
            },
            "latest",
        ),
    }
}

/// Orders responses by request id; requests without a response fail.
fn match_responses(count: usize, responses: Vec<RpcResponse>) -> Vec<CallState> {
    let mut states = vec![CallState::Failed("missing response".to_string()); count];
    for response in responses {
        if let Some(slot) = states.get_mut(response.id) {
            *slot = response_state(response);
        }
    }
    states
}

fn response_state(response: RpcResponse) -> CallState {
    if let Some(error) = response.error {
        return CallState::Failed(format!("{}: {}", error.code, error.message));
    }
    match response.result {
        None => CallState::Empty,
        Some(data) => match decode_hex_words(&data) {
            Ok(words) => CallState::from_words(words),
            Err(e) => CallState::Failed(e.to_string()),
        },
    }
}

/// Sends `calls` in chunks of at most `batch_size` concurrently and flattens
/// the results back into call order. A failed chunk fails only its own calls.
async fn read_in_chunks<'a, F, Fut>(calls: &'a [Call], batch_size: usize, send: F) -> Vec<CallState>
where
    F: Fn(&'a [Call]) -> Fut,
    Fut: Future<Output = Result<Vec<CallState>, ProtocolError>>,
{
    let batches = calls.chunks(batch_size.max(1)).map(|chunk| {
        let batch = send(chunk);
        async move {
            match batch.await {
                Ok(mut states) => {
                    states.resize(chunk.len(), CallState::Failed("missing response".to_string()));
                    states
                }
                Err(e) => {
                    warn!(calls = chunk.len(), error = %e, "eth_call batch failed");
                    vec![CallState::Failed(e.to_string()); chunk.len()]
                }
            }
        }
    });

    join_all(batches).await.into_iter().flatten().collect()
}

#[async_trait]
impl ChainReader for JsonRpcReader {
    async fn call_many(&self, chain_id: u64, calls: Vec<Call>) -> Vec<CallState> {
        if calls.is_empty() {
            return Vec::new();
        }

        let url = match self.endpoint(chain_id) {
            Ok(url) => url,
            Err(e) => {
                warn!(chain_id, error = %e, "Cannot issue reads");
                return vec![CallState::Failed(e.to_string()); calls.len()];
            }
        };

        read_in_chunks(&calls, self.config.max_batch_size, |chunk| self.send_batch(url, chunk)).await
    }
}
