//! Multi-chain wallet sign-in for a demo web front-end.
//!
//! The browser pieces are modelled as small state machines that take their
//! wallet provider as an explicit capability:
//!
//! - [`connector`]: `connect -> build challenge -> sign` per chain, plus the
//!   connect panel state
//! - [`actions`]: post-connect transfers, token calls and balance queries
//! - [`shell`]: chain selection and per-chain sessions
//!
//! Signature verification lives in `chain-eth` / `chain-sol` and is served
//! over HTTP by the `verify-server` crate.

pub mod actions;
mod busy;
pub mod challenge;
pub mod connector;
pub mod error;
pub mod provider;
pub mod shell;
pub mod types;

pub use actions::{
    EthereumActionConfig, EthereumActions, EthereumPanelState, SolanaActionConfig,
    SolanaActions, SolanaPanelState,
};
pub use challenge::{generate_nonce, SiweChallenge, SolanaChallenge};
pub use connector::{
    ConnectPanel, ConnectState, EthereumConnector, SolanaConnector, WalletConnector,
};
pub use error::DappError;
pub use provider::{
    CallRequest, Eip1193Provider, Eip1193Transport, EthereumProvider, ProviderError,
    SolanaProvider, SolanaRpc, TransactionRequest,
};
pub use shell::{PageShell, View};
pub use types::{Chain, Credentials, PageOrigin};
