use thiserror::Error;

/// Ethereum chain operation errors.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("signer recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
