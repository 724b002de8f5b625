//! Solana chain support for the dApp.
//!
//! Address handling, off-chain message verification, a hand-rolled legacy
//! transaction wire format for system transfers, lamport formatting and a
//! small JSON-RPC client. `solana-sdk` is deliberately not used; the wire
//! format is simple enough to encode with `ed25519-dalek` and `bs58`.

pub mod address;
pub mod error;
pub mod lamports;
pub mod message;
pub mod rpc;
pub mod transaction;

pub use address::{address_to_bytes, pubkey_to_address};
pub use error::{RpcError, SolError};
pub use lamports::{format_sol, lamports_to_sol, LAMPORTS_PER_SOL};
pub use message::{signature_from_base58, signature_to_base58, verify_message};
pub use rpc::{RpcClientConfig, SolanaRpcClient, DEVNET_URL};
pub use transaction::{
    build_sol_transfer, compile_transaction, decode_compact_u16, encode_compact_u16,
    system_transfer, wire_signatures, CompiledInstruction, SolAccountMeta, SolInstruction,
    SolTransaction, SIGNATURE_LEN, SYSTEM_PROGRAM_ID,
};
