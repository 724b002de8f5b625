//! Sign-in challenge messages.
//!
//! Both variants are plain text built once and never parsed back. The
//! Ethereum one follows the EIP-4361 layout closely enough for wallets to
//! render it as a sign-in request.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand_core::OsRng;

use crate::types::PageOrigin;

/// Length of the random nonce embedded in SIWE messages.
pub const NONCE_LEN: usize = 11;

const NONCE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const SIWE_STATEMENT: &str = "Sign in with Ethereum to the app.";
const SIWE_VERSION: &str = "1";
/// Ethereum mainnet.
const SIWE_CHAIN_ID: u64 = 1;
const SOLANA_HEADER: &str = "Sign in to app";

/// Random `[0-9a-z]` nonce drawn from the OS RNG.
pub fn generate_nonce() -> String {
    let mut rng = OsRng;
    (0..NONCE_LEN)
        .map(|_| NONCE_ALPHABET[rng.gen_range(0..NONCE_ALPHABET.len())] as char)
        .collect()
}

/// UTC RFC 3339 with milliseconds and a `Z` suffix.
pub fn format_issued_at(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiweChallenge {
    domain: String,
    address: String,
    uri: String,
    chain_id: u64,
    nonce: String,
    issued_at: DateTime<Utc>,
}

impl SiweChallenge {
    pub fn new(
        origin: &PageOrigin,
        address: &str,
        nonce: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: origin.host.clone(),
            address: address.to_string(),
            uri: origin.origin.clone(),
            chain_id: SIWE_CHAIN_ID,
            nonce: nonce.into(),
            issued_at,
        }
    }

    /// Challenge with a fresh nonce, issued at `now`.
    pub fn build(origin: &PageOrigin, address: &str, now: DateTime<Utc>) -> Self {
        Self::new(origin, address, generate_nonce(), now)
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SiweChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{domain} wants you to sign in with your Ethereum account:\n\
             {address}\n\
             \n\
             {SIWE_STATEMENT}\n\
             \n\
             URI: {uri}\n\
             Version: {SIWE_VERSION}\n\
             Chain ID: {chain_id}\n\
             Nonce: {nonce}\n\
             Issued At: {issued_at}",
            domain = self.domain,
            address = self.address,
            uri = self.uri,
            chain_id = self.chain_id,
            nonce = self.nonce,
            issued_at = format_issued_at(&self.issued_at),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolanaChallenge {
    public_key: String,
    issued_at: DateTime<Utc>,
}

impl SolanaChallenge {
    pub fn new(public_key: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            public_key: public_key.to_string(),
            issued_at,
        }
    }

    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SolanaChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SOLANA_HEADER}\n\nWallet: {}\nTimestamp: {}",
            self.public_key,
            format_issued_at(&self.issued_at)
        )
    }
}
