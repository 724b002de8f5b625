use alloy_primitives::U256;

use crate::abi::{decode_uint256_word, encode_function_call, function_selector, AbiParam};
use crate::address::parse_address;
use crate::error::EthError;

/// Canonical signature of the ERC-20 transfer method.
pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";

/// Canonical signature of the ERC-20 balance query.
pub const BALANCE_OF_SIGNATURE: &str = "balanceOf(address)";

/// Encodes an ERC-20 `transfer(address,uint256)` call.
///
/// Returns the complete calldata: 4-byte selector followed by the recipient
/// and amount words (68 bytes total).
pub fn encode_transfer(to: &str, amount: U256) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(to)?;
    let params = [AbiParam::Address(addr), AbiParam::Uint256(amount)];
    Ok(encode_function_call(
        function_selector(TRANSFER_SIGNATURE),
        &params,
    ))
}

/// Encodes an ERC-20 `balanceOf(address)` call (36 bytes of calldata).
pub fn encode_balance_of(owner: &str) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(owner)?;
    Ok(encode_function_call(
        function_selector(BALANCE_OF_SIGNATURE),
        &[AbiParam::Address(addr)],
    ))
}

/// Decodes the single `uint256` returned by `balanceOf`.
///
/// `result` is the hex string an `eth_call` returns (`0x`-prefixed or not).
pub fn decode_balance_of(result: &str) -> Result<U256, EthError> {
    let hex_str = result.strip_prefix("0x").unwrap_or(result);
    let data = hex::decode(hex_str)
        .map_err(|e| EthError::EncodingError(format!("invalid return data hex: {e}")))?;
    decode_uint256_word(&data, 0)
}
