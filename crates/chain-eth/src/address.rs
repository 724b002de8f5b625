use k256::ecdsa::VerifyingKey;
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Derives the EIP-55 checksummed address of a secp256k1 verifying key.
///
/// The address is the last 20 bytes of the Keccak-256 hash of the 64-byte
/// uncompressed public key (without its 0x04 prefix).
pub fn verifying_key_to_address(key: &VerifyingKey) -> String {
    let uncompressed = key.to_encoded_point(false);
    let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);
    checksum_bytes(&hash[12..])
}

/// Parses a 0x-prefixed hex address into its 20 raw bytes. The EIP-55
/// checksum is not enforced.
pub fn parse_address(address: &str) -> Result<[u8; 20], EthError> {
    let hex_part = strip_hex_prefix(address)?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// Compares two addresses case-insensitively, the way wallets and
/// `ethers.verifyMessage` callers conventionally do.
pub fn addresses_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn strip_hex_prefix(address: &str) -> Result<&str, EthError> {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))
}

fn checksum_bytes(addr: &[u8]) -> String {
    let lower = hex::encode(addr);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in lower.chars().enumerate() {
        // Nibble i of the hash decides the case of hex digit i.
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    checksummed
}
