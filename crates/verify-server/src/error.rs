use chain_eth::EthError;
use chain_sol::SolError;
use thiserror::Error;

/// Why a verification request could not be evaluated. Every variant is
/// answered with HTTP 500.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Ethereum(#[from] EthError),

    #[error(transparent)]
    Solana(#[from] SolError),
}
