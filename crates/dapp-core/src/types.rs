use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DappError;

/// Chains the page can sign in with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    #[default]
    Ethereum,
    Solana,
}

impl Chain {
    pub fn display_name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Solana => "Solana",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result of a successful connect + sign round.
///
/// `signature` is `0x`-hex for Ethereum and Base58 for Solana.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub chain: Chain,
    pub address: String,
    pub signature: String,
    pub message: String,
}

/// The page's own location, as a browser would report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOrigin {
    /// `host[:port]`, used as the SIWE domain.
    pub host: String,
    /// `scheme://host[:port]`, used as the SIWE URI.
    pub origin: String,
}

impl PageOrigin {
    pub fn new(host: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            origin: origin.into(),
        }
    }

    /// Derive host and origin from a page URL.
    pub fn parse(page_url: &str) -> Result<Self, DappError> {
        let url = Url::parse(page_url)
            .map_err(|e| DappError::Encoding(format!("invalid page url: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| DappError::Encoding(format!("page url has no host: {page_url}")))?;

        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            host,
            origin: url.origin().ascii_serialization(),
        })
    }
}

impl Default for PageOrigin {
    fn default() -> Self {
        Self::new("localhost:3000", "http://localhost:3000")
    }
}
