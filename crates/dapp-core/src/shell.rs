use tracing::info;

use crate::types::{Chain, Credentials};

/// What the page shows for the selected chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Connect { chain: Chain },
    Connected { chain: Chain, address: String },
}

/// Chain selector plus one verified session per chain.
#[derive(Debug, Clone, Default)]
pub struct PageShell {
    selected: Chain,
    ethereum: Option<String>,
    solana: Option<String>,
}

impl PageShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Chain {
        self.selected
    }

    pub fn select(&mut self, chain: Chain) {
        self.selected = chain;
    }

    /// Success callback for a connect panel.
    pub fn on_connected(&mut self, credentials: &Credentials) {
        info!(
            chain = %credentials.chain,
            address = %credentials.address,
            signature = %credentials.signature,
            "wallet connected"
        );
        *self.slot_mut(credentials.chain) = Some(credentials.address.clone());
    }

    pub fn disconnect(&mut self, chain: Chain) {
        *self.slot_mut(chain) = None;
    }

    pub fn is_verified(&self, chain: Chain) -> bool {
        self.address(chain).is_some()
    }

    pub fn address(&self, chain: Chain) -> Option<&str> {
        match chain {
            Chain::Ethereum => self.ethereum.as_deref(),
            Chain::Solana => self.solana.as_deref(),
        }
    }

    pub fn view(&self) -> View {
        let chain = self.selected;
        match self.address(chain) {
            Some(address) => View::Connected {
                chain,
                address: address.to_string(),
            },
            None => View::Connect { chain },
        }
    }

    fn slot_mut(&mut self, chain: Chain) -> &mut Option<String> {
        match chain {
            Chain::Ethereum => &mut self.ethereum,
            Chain::Solana => &mut self.solana,
        }
    }
}
