//! EIP-191 `personal_sign` messages.
//!
//! The signed digest is
//! `keccak256("\x19Ethereum Signed Message:\n" || decimal(len(message)) || message)`
//! and signatures travel as 65 bytes `r || s || v`, hex encoded with a `0x`
//! prefix. Wallets emit `v` as 27/28; 0/1 is accepted as well.

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::address::{addresses_match, verifying_key_to_address};
use crate::error::EthError;

/// Length of an encoded `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

const PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Result of comparing a recovered signer against a claimed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The recovered address equals the claimed one (ignoring case).
    Match(String),
    /// The signature is valid but was produced by a different key.
    Mismatch(String),
}

impl VerifyOutcome {
    /// The checksummed address recovered from the signature.
    pub fn recovered(&self) -> &str {
        match self {
            VerifyOutcome::Match(addr) | VerifyOutcome::Mismatch(addr) => addr,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, VerifyOutcome::Match(_))
    }
}

/// Hashes `message` with the EIP-191 version 0x45 prefix.
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// Signs `message` as `personal_sign` would with the given private key.
///
/// Returns the 65-byte signature `r || s || v` with `v` in {27, 28}.
pub fn sign_message(
    message: &[u8],
    private_key: &[u8; 32],
) -> Result<[u8; SIGNATURE_LEN], EthError> {
    let digest = hash_message(message);

    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();
    let signing_key = signing_key?;

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(&digest)
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let mut out = [0u8; SIGNATURE_LEN];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = recovery_id.to_byte() + 27;
    Ok(out)
}

/// Parses a hex `r || s || v` signature (with or without `0x`).
pub fn parse_signature(signature: &str) -> Result<(Signature, RecoveryId), EthError> {
    let hex_str = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes = hex::decode(hex_str)
        .map_err(|e| EthError::InvalidSignature(format!("invalid hex: {e}")))?;

    if bytes.len() != SIGNATURE_LEN {
        return Err(EthError::InvalidSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    let v = match bytes[64] {
        0 | 27 => 0,
        1 | 28 => 1,
        other => {
            return Err(EthError::InvalidSignature(format!(
                "unsupported recovery byte {other}"
            )))
        }
    };

    let signature = Signature::from_slice(&bytes[..64])
        .map_err(|e| EthError::InvalidSignature(e.to_string()))?;
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| EthError::InvalidSignature(format!("invalid recovery id {v}")))?;

    // k256 only recovers from low-s signatures; flip high-s ones onto the
    // other half of the curve order and invert the parity to match.
    match signature.normalize_s() {
        Some(normalized) => {
            let flipped = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
            Ok((normalized, flipped))
        }
        None => Ok((signature, recovery_id)),
    }
}

/// Recovers the EIP-55 checksummed address that signed `message`.
pub fn recover_address(message: &[u8], signature: &str) -> Result<String, EthError> {
    let (signature, recovery_id) = parse_signature(signature)?;
    let digest = hash_message(message);

    let key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)
        .map_err(|e| EthError::RecoveryFailed(e.to_string()))?;

    Ok(verifying_key_to_address(&key))
}

/// Recovers the signer of `message` and compares it with `claimed_address`.
pub fn verify_message(
    message: &[u8],
    signature: &str,
    claimed_address: &str,
) -> Result<VerifyOutcome, EthError> {
    let recovered = recover_address(message, signature)?;

    if addresses_match(&recovered, claimed_address) {
        Ok(VerifyOutcome::Match(recovered))
    } else {
        Ok(VerifyOutcome::Mismatch(recovered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ONE_ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

    fn key(last_byte: u8) -> [u8; 32] {
        let mut k = [0u8; 32];
        k[31] = last_byte;
        k
    }

    #[test]
    fn hash_message_matches_known_vector() {
        // keccak256("\x19Ethereum Signed Message:\n11hello world")
        assert_eq!(
            hex::encode(hash_message(b"hello world")),
            "d9eba16ed0ecae432b71fe008c98cc872bb4cc214d3220a36f365326cf807d68"
        );
    }

    #[test]
    fn sign_then_recover_returns_signer() {
        let sig = sign_message(b"sign in please", &key(1)).unwrap();
        assert!(sig[64] == 27 || sig[64] == 28);

        let recovered =
            recover_address(b"sign in please", &format!("0x{}", hex::encode(sig))).unwrap();
        assert_eq!(recovered, KEY_ONE_ADDRESS);
    }

    #[test]
    fn recover_accepts_unprefixed_hex_and_zero_based_v() {
        let mut sig = sign_message(b"abc", &key(1)).unwrap();
        sig[64] -= 27;

        let recovered = recover_address(b"abc", &hex::encode(sig)).unwrap();
        assert_eq!(recovered, KEY_ONE_ADDRESS);
    }

    #[test]
    fn high_s_signature_still_recovers() {
        use k256::Scalar;

        let sig = sign_message(b"malleable", &key(1)).unwrap();
        let (low, recid) = parse_signature(&hex::encode(sig)).unwrap();

        let low_s: Scalar = *low.s();
        let high = Signature::from_scalars(low.r().to_bytes(), (-low_s).to_bytes()).unwrap();
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..64].copy_from_slice(&high.to_bytes());
        bytes[64] = (!recid.is_y_odd()) as u8 + 27;

        let recovered = recover_address(b"malleable", &hex::encode(bytes)).unwrap();
        assert_eq!(recovered, KEY_ONE_ADDRESS);
    }

    #[test]
    fn verify_matches_lowercased_claim() {
        let sig = hex::encode(sign_message(b"m", &key(1)).unwrap());
        let outcome = verify_message(b"m", &sig, &KEY_ONE_ADDRESS.to_lowercase()).unwrap();

        assert!(outcome.is_match());
        assert_eq!(outcome.recovered(), KEY_ONE_ADDRESS);
    }

    #[test]
    fn verify_other_key_is_mismatch() {
        let sig = hex::encode(sign_message(b"m", &key(2)).unwrap());
        let outcome = verify_message(b"m", &sig, KEY_ONE_ADDRESS).unwrap();

        assert!(!outcome.is_match());
        assert_ne!(outcome.recovered(), KEY_ONE_ADDRESS);
    }

    #[test]
    fn tampered_message_recovers_different_address() {
        let sig = hex::encode(sign_message(b"original", &key(1)).unwrap());
        let outcome = verify_message(b"tampered", &sig, KEY_ONE_ADDRESS).unwrap();
        assert!(!outcome.is_match());
    }

    #[test]
    fn malformed_signatures_are_errors() {
        assert!(matches!(
            recover_address(b"m", "0xnothex"),
            Err(EthError::InvalidSignature(_))
        ));
        assert!(matches!(
            recover_address(b"m", "0xdeadbeef"),
            Err(EthError::InvalidSignature(_))
        ));

        let mut sig = sign_message(b"m", &key(1)).unwrap();
        sig[64] = 5;
        assert!(matches!(
            recover_address(b"m", &hex::encode(sig)),
            Err(EthError::InvalidSignature(_))
        ));
    }

    #[test]
    fn zero_signature_is_rejected() {
        let sig = format!("0x{}1b", "00".repeat(64));
        assert!(recover_address(b"m", &sig).is_err());
    }

    #[test]
    fn zero_private_key_is_rejected() {
        assert!(matches!(
            sign_message(b"m", &[0u8; 32]),
            Err(EthError::InvalidPrivateKey(_))
        ));
    }
}
