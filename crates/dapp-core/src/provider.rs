//! Wallet and RPC capabilities.
//!
//! Injected browser providers become trait objects handed to connectors and
//! action panels. Anything that can answer these calls (a browser bridge, a
//! local key, a test double) can drive the UI state machines.

use async_trait::async_trait;
use chain_sol::{RpcError, SolTransaction, SolanaRpcClient};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Error surfaced by a wallet provider, shaped like an EIP-1193 error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    /// EIP-1193 "User Rejected Request".
    pub const USER_REJECTED: i64 = 4001;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::with_code(Self::USER_REJECTED, message)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(Self::USER_REJECTED)
    }
}

/// `eth_sendTransaction` parameter object. Quantities are `0x` hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
}

/// `eth_call` parameter object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub to: String,
    pub data: String,
}

/// Typed view of an injected Ethereum provider.
#[async_trait]
pub trait EthereumProvider: Send + Sync {
    /// `eth_requestAccounts`
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// `personal_sign`; returns the `0x`-hex 65-byte signature.
    async fn personal_sign(&self, message: &str, address: &str) -> Result<String, ProviderError>;

    /// `eth_sendTransaction`; returns the transaction hash.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ProviderError>;

    /// `eth_call` at `block`; returns the raw `0x`-hex result.
    async fn call(&self, call: &CallRequest, block: &str) -> Result<String, ProviderError>;
}

/// Typed view of an injected Solana provider.
#[async_trait]
pub trait SolanaProvider: Send + Sync {
    /// Connect and return the wallet's 32-byte public key.
    async fn connect(&self) -> Result<[u8; 32], ProviderError>;

    /// Sign raw message bytes; returns the 64-byte Ed25519 signature.
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, ProviderError>;

    /// Sign without broadcasting; returns the signed wire transaction.
    async fn sign_transaction(&self, tx: &SolTransaction) -> Result<Vec<u8>, ProviderError>;

    /// Sign and broadcast; returns the Base58 transaction signature.
    async fn sign_and_send_transaction(&self, tx: &SolTransaction)
        -> Result<String, ProviderError>;
}

/// Solana JSON-RPC calls the action panel needs.
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    async fn get_balance(&self, address: &str) -> Result<u64, RpcError>;

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], RpcError>;
}

#[async_trait]
impl SolanaRpc for SolanaRpcClient {
    async fn get_balance(&self, address: &str) -> Result<u64, RpcError> {
        SolanaRpcClient::get_balance(self, address).await
    }

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], RpcError> {
        SolanaRpcClient::get_latest_blockhash(self).await
    }
}

// ---------------------------------------------------------------------------
// EIP-1193 adapter
// ---------------------------------------------------------------------------

/// Raw EIP-1193 `request({ method, params })` entry point.
#[async_trait]
pub trait Eip1193Transport: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

/// Adapts a raw [`Eip1193Transport`] to [`EthereumProvider`].
pub struct Eip1193Provider<T> {
    transport: T,
}

impl<T: Eip1193Transport> Eip1193Provider<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn request_string(&self, method: &str, params: Value) -> Result<String, ProviderError> {
        match self.transport.request(method, params).await? {
            Value::String(s) => Ok(s),
            other => Err(ProviderError::new(format!(
                "{method}: expected a string result, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl<T: Eip1193Transport> EthereumProvider for Eip1193Provider<T> {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let result = self
            .transport
            .request("eth_requestAccounts", Value::Array(Vec::new()))
            .await?;

        serde_json::from_value(result)
            .map_err(|e| ProviderError::new(format!("eth_requestAccounts: {e}")))
    }

    async fn personal_sign(&self, message: &str, address: &str) -> Result<String, ProviderError> {
        self.request_string("personal_sign", json!([message, address]))
            .await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ProviderError> {
        self.request_string("eth_sendTransaction", json!([tx])).await
    }

    async fn call(&self, call: &CallRequest, block: &str) -> Result<String, ProviderError> {
        self.request_string("eth_call", json!([call, block])).await
    }
}
