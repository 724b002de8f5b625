//! Ethereum/EVM chain support for the sign-in toolkit.
//!
//! This crate provides:
//! - EIP-55 checksummed address derivation and parsing
//! - EIP-191 `personal_sign` hashing, signing and signer recovery
//! - ERC-20 interaction encoding (transfer, balanceOf) and return decoding
//! - Conversions between decimal unit strings and base-unit integers
//! - Minimal ABI encoding utilities

pub mod abi;
pub mod address;
pub mod erc20;
pub mod error;
pub mod personal_sign;
pub mod units;

pub use alloy_primitives::U256;
pub use error::EthError;
pub use personal_sign::{hash_message, recover_address, sign_message, verify_message, VerifyOutcome};
