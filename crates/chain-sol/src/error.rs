use thiserror::Error;

/// Solana chain operation errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Errors talking to a Solana JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Rejected before anything was sent.
    #[error("invalid rpc request: {0}")]
    InvalidRequest(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid rpc response: {0}")]
    InvalidResponse(String),

    #[error("invalid rpc url: {0}")]
    Url(#[from] url::ParseError),
}
