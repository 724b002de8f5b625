//! Wallet connectors and the connect panel.
//!
//! A connector runs one `connect -> build challenge -> sign` round against
//! an injected provider and yields [`Credentials`]. [`ConnectPanel`] wraps a
//! connector with the state a connect view renders.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chain_sol::{pubkey_to_address, signature_to_base58, SIGNATURE_LEN};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::busy::{lock, BusyGuard, InFlight};
use crate::challenge::{SiweChallenge, SolanaChallenge};
use crate::error::DappError;
use crate::provider::{EthereumProvider, SolanaProvider};
use crate::types::{Chain, Credentials, PageOrigin};

/// Shown when a failure carries no message of its own.
pub const FALLBACK_ERROR: &str = "connection failed";

#[async_trait]
pub trait WalletConnector: Send + Sync {
    fn chain(&self) -> Chain;

    async fn connect(&self) -> Result<Credentials, DappError>;
}

// ---------------------------------------------------------------------------
// Ethereum
// ---------------------------------------------------------------------------

pub struct EthereumConnector {
    provider: Option<Arc<dyn EthereumProvider>>,
    origin: PageOrigin,
}

impl EthereumConnector {
    pub fn new(provider: Option<Arc<dyn EthereumProvider>>, origin: PageOrigin) -> Self {
        Self { provider, origin }
    }
}

#[async_trait]
impl WalletConnector for EthereumConnector {
    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    async fn connect(&self) -> Result<Credentials, DappError> {
        let provider = self.provider.as_ref().ok_or(DappError::WalletNotDetected)?;

        let accounts = provider.request_accounts().await?;
        let address = accounts.into_iter().next().ok_or(DappError::NoAccounts)?;

        let message = SiweChallenge::build(&self.origin, &address, Utc::now()).text();
        debug!(%address, message = %message, "requesting SIWE signature");

        let signature = provider.personal_sign(&message, &address).await?;
        info!(%address, "ethereum wallet signed in");

        Ok(Credentials {
            chain: Chain::Ethereum,
            address,
            signature,
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// Solana
// ---------------------------------------------------------------------------

pub struct SolanaConnector {
    provider: Option<Arc<dyn SolanaProvider>>,
}

impl SolanaConnector {
    pub fn new(provider: Option<Arc<dyn SolanaProvider>>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl WalletConnector for SolanaConnector {
    fn chain(&self) -> Chain {
        Chain::Solana
    }

    async fn connect(&self) -> Result<Credentials, DappError> {
        let provider = self.provider.as_ref().ok_or(DappError::WalletNotDetected)?;

        let public_key = provider.connect().await?;
        let address = pubkey_to_address(&public_key);

        let message = SolanaChallenge::new(&address, Utc::now()).text();
        debug!(%address, message = %message, "requesting solana message signature");

        let raw = provider.sign_message(message.as_bytes()).await?;
        if raw.len() != SIGNATURE_LEN {
            return Err(DappError::Provider(format!(
                "wallet returned a {}-byte signature, expected {SIGNATURE_LEN}",
                raw.len()
            )));
        }
        let signature = signature_to_base58(&raw)?;
        info!(%address, "solana wallet signed in");

        Ok(Credentials {
            chain: Chain::Solana,
            address,
            signature,
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// Connect panel
// ---------------------------------------------------------------------------

/// What the connect view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectState {
    pub address: Option<String>,
    pub is_connecting: bool,
    pub error: Option<String>,
}

impl InFlight for ConnectState {
    fn in_flight(&mut self) -> &mut bool {
        &mut self.is_connecting
    }
}

pub struct ConnectPanel {
    connector: Arc<dyn WalletConnector>,
    state: Mutex<ConnectState>,
}

impl ConnectPanel {
    pub fn new(connector: Arc<dyn WalletConnector>) -> Self {
        Self {
            connector,
            state: Mutex::new(ConnectState::default()),
        }
    }

    pub fn chain(&self) -> Chain {
        self.connector.chain()
    }

    pub fn state(&self) -> ConnectState {
        lock(&self.state).clone()
    }

    /// Run one connect round. `on_success` is called exactly once when it
    /// succeeds and never when it fails. Overlapping calls get `Busy`.
    /// Dropping the returned future mid-flight releases the panel.
    pub async fn connect<F>(&self, on_success: F) -> Result<Credentials, DappError>
    where
        F: FnOnce(&Credentials) + Send,
    {
        let guard = BusyGuard::acquire(&self.state, |state| state.error = None)?;

        match self.connector.connect().await {
            Ok(credentials) => {
                guard.finish(|state| state.address = Some(credentials.address.clone()));
                on_success(&credentials);
                Ok(credentials)
            }
            Err(err) => {
                let text = err.to_string();
                warn!(chain = %self.connector.chain(), error = %text, "wallet connect failed");
                guard.finish(|state| {
                    state.error = Some(if text.trim().is_empty() {
                        FALLBACK_ERROR.to_string()
                    } else {
                        text
                    });
                });
                Err(err)
            }
        }
    }
}
