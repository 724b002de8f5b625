//! Solana addresses.
//!
//! An address is the Base58 encoding of a raw 32-byte Ed25519 public key; no
//! hashing is involved.

use crate::error::SolError;

/// Encode a 32-byte public key as a Solana address.
pub fn pubkey_to_address(pubkey: &[u8; 32]) -> String {
    bs58::encode(pubkey).into_string()
}

/// Decode a Solana address into its 32 public key bytes.
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], SolError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}
