//! Minimal ABI encoding for EVM function calls.
//!
//! Only static 32-byte words are supported, which covers the ERC-20 calls the
//! action panel issues (`transfer(address,uint256)` and `balanceOf(address)`).

use alloy_primitives::U256;
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Size of one ABI word in bytes.
pub const WORD_SIZE: usize = 32;

/// A single statically-sized ABI parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiParam {
    /// A 20-byte Ethereum address, left-padded to 32 bytes.
    Address([u8; 20]),
    /// A 256-bit unsigned integer, big-endian.
    Uint256(U256),
}

/// Computes the 4-byte selector of a canonical function signature such as
/// `"transfer(address,uint256)"`.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Encodes a function call as `selector || word(params[0]) || word(params[1]) || ...`.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + params.len() * WORD_SIZE);
    data.extend_from_slice(&selector);

    for param in params {
        data.extend_from_slice(&encode_param(param));
    }

    data
}

/// Decodes the `index`-th static word of ABI return data as a uint256.
pub fn decode_uint256_word(data: &[u8], index: usize) -> Result<U256, EthError> {
    let start = index * WORD_SIZE;
    let end = start + WORD_SIZE;
    let word = data.get(start..end).ok_or_else(|| {
        EthError::EncodingError(format!(
            "expected at least {end} bytes of return data, got {}",
            data.len()
        ))
    })?;

    Ok(U256::from_be_slice(word))
}

fn encode_param(param: &AbiParam) -> [u8; WORD_SIZE] {
    match param {
        AbiParam::Address(addr) => {
            let mut word = [0u8; WORD_SIZE];
            word[12..].copy_from_slice(addr);
            word
        }
        AbiParam::Uint256(value) => value.to_be_bytes::<WORD_SIZE>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_of_erc20_transfer() {
        assert_eq!(
            function_selector("transfer(address,uint256)"),
            [0xa9, 0x05, 0x9c, 0xbb]
        );
    }

    #[test]
    fn selector_of_erc20_balance_of() {
        assert_eq!(
            function_selector("balanceOf(address)"),
            [0x70, 0xa0, 0x82, 0x31]
        );
    }

    #[test]
    fn encode_address_param_is_left_padded() {
        let mut addr = [0u8; 20];
        addr[0] = 0xde;
        addr[19] = 0xad;

        let word = encode_param(&AbiParam::Address(addr));

        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], &addr);
    }

    #[test]
    fn encode_uint256_param_is_big_endian() {
        let word = encode_param(&AbiParam::Uint256(U256::from(0x0102u64)));
        assert_eq!(&word[..30], &[0u8; 30]);
        assert_eq!(word[30], 0x01);
        assert_eq!(word[31], 0x02);
    }

    #[test]
    fn encode_function_call_with_selector_only() {
        let selector = [0xa9, 0x05, 0x9c, 0xbb];
        let data = encode_function_call(selector, &[]);
        assert_eq!(data, selector.to_vec());
    }

    #[test]
    fn encode_function_call_with_params() {
        let selector = [0xa9, 0x05, 0x9c, 0xbb];
        let mut addr = [0u8; 20];
        addr[19] = 0x01;

        let params = [AbiParam::Address(addr), AbiParam::Uint256(U256::from(100u64))];
        let data = encode_function_call(selector, &params);

        assert_eq!(data.len(), 68);
        assert_eq!(&data[..4], &selector);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(data[35], 0x01);
        assert_eq!(data[67], 100);
    }

    #[test]
    fn decode_second_word() {
        let mut data = vec![0u8; 64];
        data[31] = 1;
        data[63] = 2;

        assert_eq!(decode_uint256_word(&data, 0).unwrap(), U256::from(1u64));
        assert_eq!(decode_uint256_word(&data, 1).unwrap(), U256::from(2u64));
    }

    #[test]
    fn decode_past_end_errors() {
        let data = vec![0u8; 40];
        assert!(decode_uint256_word(&data, 1).is_err());
    }
}
