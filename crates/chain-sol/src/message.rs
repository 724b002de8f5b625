//! Off-chain message signatures (`signMessage`).
//!
//! Wallets sign the raw UTF-8 bytes of the message with Ed25519; the
//! signature is exchanged as Base58.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::address::address_to_bytes;
use crate::error::SolError;
use crate::transaction::SIGNATURE_LEN;

/// Encode a raw signature as Base58.
pub fn signature_to_base58(signature: &[u8]) -> Result<String, SolError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(SolError::InvalidSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }
    Ok(bs58::encode(signature).into_string())
}

/// Decode a Base58 signature into its 64 bytes.
pub fn signature_from_base58(signature: &str) -> Result<[u8; SIGNATURE_LEN], SolError> {
    let bytes = bs58::decode(signature)
        .into_vec()
        .map_err(|e| SolError::InvalidSignature(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidSignature(format!("expected {SIGNATURE_LEN} bytes, got {}", v.len()))
    })
}

/// Check a Base58 signature over `message` against a Base58 address.
///
/// Returns `Ok(false)` for a well-formed signature from another key and an
/// error when the address or signature cannot be decoded.
pub fn verify_message(message: &[u8], signature: &str, address: &str) -> Result<bool, SolError> {
    let pubkey = address_to_bytes(address)?;
    let key = VerifyingKey::from_bytes(&pubkey)
        .map_err(|e| SolError::InvalidPublicKey(e.to_string()))?;
    let signature = Signature::from_bytes(&signature_from_base58(signature)?);

    Ok(key.verify(message, &signature).is_ok())
}
