use chain_eth::EthError;
use chain_sol::{RpcError, SolError};
use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum DappError {
    #[error("no wallet detected, open this page in a wallet-enabled browser")]
    WalletNotDetected,

    #[error("wallet returned no accounts")]
    NoAccounts,

    /// EIP-1193 code 4001. Carries the wallet's own message.
    #[error("{0}")]
    UserRejected(String),

    #[error("{0}")]
    Provider(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("another request is already in progress")]
    Busy,
}

impl From<ProviderError> for DappError {
    fn from(e: ProviderError) -> Self {
        if e.is_user_rejection() {
            DappError::UserRejected(e.message)
        } else {
            DappError::Provider(e.message)
        }
    }
}

impl From<EthError> for DappError {
    fn from(e: EthError) -> Self {
        match e {
            EthError::InvalidAddress(msg) => DappError::InvalidAddress(msg),
            other => DappError::Encoding(other.to_string()),
        }
    }
}

impl From<SolError> for DappError {
    fn from(e: SolError) -> Self {
        match e {
            SolError::InvalidAddress(msg) | SolError::InvalidPublicKey(msg) => {
                DappError::InvalidAddress(msg)
            }
            other => DappError::Encoding(other.to_string()),
        }
    }
}
