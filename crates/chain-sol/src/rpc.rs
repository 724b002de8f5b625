//! Minimal Solana JSON-RPC client.
//!
//! Only the two calls the action panel needs are implemented:
//! `getBalance` and `getLatestBlockhash`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::address::address_to_bytes;
use crate::error::RpcError;

/// Public devnet endpoint used by the demo.
pub const DEVNET_URL: &str = "https://api.devnet.solana.com";

/// RPC client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcClientConfig {
    pub url: String,
    pub commitment: String,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            url: DEVNET_URL.to_string(),
            commitment: "confirmed".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Responses wrapped in `{ context, value }`.
#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

/// JSON-RPC client for a single Solana cluster endpoint.
#[derive(Debug)]
pub struct SolanaRpcClient {
    http_client: Client,
    url: Url,
    commitment: String,
    next_id: AtomicU64,
}

impl SolanaRpcClient {
    pub fn with_config(config: RpcClientConfig) -> Result<Self, RpcError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            url: Url::parse(&config.url)?,
            commitment: config.commitment,
            next_id: AtomicU64::new(1),
        })
    }

    /// Lamport balance of `address`.
    pub async fn get_balance(&self, address: &str) -> Result<u64, RpcError> {
        // Reject malformed keys locally instead of round-tripping to the node.
        address_to_bytes(address).map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

        let balance: WithContext<u64> = self
            .call("getBalance", json!([address, { "commitment": self.commitment }]))
            .await?;
        Ok(balance.value)
    }

    /// Latest blockhash as raw bytes.
    pub async fn get_latest_blockhash(&self) -> Result<[u8; 32], RpcError> {
        let latest: WithContext<BlockhashValue> = self
            .call("getLatestBlockhash", json!([{ "commitment": self.commitment }]))
            .await?;

        let bytes = bs58::decode(&latest.value.blockhash)
            .into_vec()
            .map_err(|e| RpcError::InvalidResponse(format!("blockhash is not base58: {e}")))?;

        bytes.try_into().map_err(|v: Vec<u8>| {
            RpcError::InvalidResponse(format!("blockhash must be 32 bytes, got {}", v.len()))
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, url = %self.url, "solana rpc request");

        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response: RpcResponse<T> = self
            .http_client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        response
            .result
            .ok_or_else(|| RpcError::InvalidResponse(format!("{method}: missing result")))
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
