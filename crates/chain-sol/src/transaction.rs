//! Legacy Solana transaction wire format.
//!
//! Transactions are built by hand so the action panel can hand an unsigned
//! transfer to a wallet provider without depending on `solana-sdk`:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```


use crate::error::SolError;

/// The System Program public key: 32 zero bytes (`11111111111111111111111111111111`).
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// Length of an Ed25519 signature slot.
pub const SIGNATURE_LEN: usize = 64;

/// System Program `Transfer` instruction index (little-endian u32).
const SYSTEM_TRANSFER_IX_INDEX: u32 = 2;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 (shortvec) format.
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value, returning `(value, bytes_consumed)`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;

    for (i, byte) in data.iter().take(3).enumerate() {
        value |= ((byte & 0x7f) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return u16::try_from(value)
                .map(|v| (v, i + 1))
                .map_err(|_| SolError::SerializationError("compact-u16 value overflow".into()));
        }
    }

    Err(SolError::SerializationError(
        "unexpected end of data while decoding compact-u16".into(),
    ))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in a Solana instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A Solana instruction before it is compiled into a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolInstruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

/// A compiled instruction whose accounts are indices into `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// An unsigned legacy transaction: the message plus the number of signature
/// slots it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolTransaction {
    /// Account keys in canonical order: writable signers (fee payer first),
    /// read-only signers, writable non-signers, read-only non-signers.
    pub account_keys: Vec<[u8; 32]>,
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    pub recent_blockhash: [u8; 32],
    pub compiled_instructions: Vec<CompiledInstruction>,
}

impl SolTransaction {
    /// Serialize the message, i.e. the bytes every signer signs.
    pub fn message_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);

        buf.extend_from_slice(&encode_compact_u16(self.account_keys.len() as u16));
        for key in &self.account_keys {
            buf.extend_from_slice(key);
        }

        buf.extend_from_slice(&self.recent_blockhash);

        buf.extend_from_slice(&encode_compact_u16(
            self.compiled_instructions.len() as u16,
        ));
        for ix in &self.compiled_instructions {
            buf.push(ix.program_id_index);
            buf.extend_from_slice(&encode_compact_u16(ix.account_indices.len() as u16));
            buf.extend_from_slice(&ix.account_indices);
            buf.extend_from_slice(&encode_compact_u16(ix.data.len() as u16));
            buf.extend_from_slice(&ix.data);
        }

        buf
    }

    /// Assemble the wire format from one signature per required signer.
    pub fn to_wire(&self, signatures: &[[u8; SIGNATURE_LEN]]) -> Result<Vec<u8>, SolError> {
        if signatures.len() != self.num_required_signatures as usize {
            return Err(SolError::SigningError(format!(
                "expected {} signatures, got {}",
                self.num_required_signatures,
                signatures.len()
            )));
        }

        let message = self.message_bytes();
        let mut wire = Vec::with_capacity(3 + signatures.len() * SIGNATURE_LEN + message.len());
        wire.extend_from_slice(&encode_compact_u16(signatures.len() as u16));
        for sig in signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&message);
        Ok(wire)
    }
}

// ---------------------------------------------------------------------------
// Transaction building
// ---------------------------------------------------------------------------

/// Build a System Program `Transfer` instruction moving `lamports` from `from` to `to`.
pub fn system_transfer(from: &[u8; 32], to: &[u8; 32], lamports: u64) -> SolInstruction {
    // u32 LE instruction index followed by u64 LE lamports.
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    SolInstruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta {
                pubkey: *from,
                is_signer: true,
                is_writable: true,
            },
            SolAccountMeta {
                pubkey: *to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data,
    }
}

/// Build a single-instruction native SOL transfer paid for by `from`.
pub fn build_sol_transfer(
    from: &[u8; 32],
    to: &[u8; 32],
    lamports: u64,
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    if lamports == 0 {
        return Err(SolError::TransactionBuildError(
            "lamports must be > 0".into(),
        ));
    }

    compile_transaction(&[system_transfer(from, to, lamports)], from, recent_blockhash)
}

/// Compile instructions into a transaction with a single fee payer at index 0.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    let mut entries: Vec<SolAccountMeta> = Vec::new();

    let mut upsert = |pubkey: [u8; 32], signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(SolAccountMeta {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    upsert(*fee_payer, true, true);
    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        upsert(ix.program_id, false, false);
    }

    // Stable sort keeps the fee payer ahead of other writable signers.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    let count = |pred: fn(&SolAccountMeta) -> bool| entries.iter().filter(|e| pred(e)).count();
    let num_required_signatures = to_u8(count(|e| e.is_signer), "signers")?;
    let num_readonly_signed = to_u8(count(|e| e.is_signer && !e.is_writable), "read-only signers")?;
    let num_readonly_unsigned =
        to_u8(count(|e| !e.is_signer && !e.is_writable), "read-only accounts")?;

    let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();
    let index_of = |key: &[u8; 32]| -> Result<u8, SolError> {
        let idx = account_keys
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| SolError::TransactionBuildError("account not in account keys".into()))?;
        to_u8(idx, "account index")
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey))
            .collect::<Result<Vec<_>, _>>()?;

        compiled.push(CompiledInstruction {
            program_id_index: index_of(&ix.program_id)?,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(SolTransaction {
        account_keys,
        num_required_signatures,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Read the signature slots from a wire-format transaction.
pub fn wire_signatures(wire: &[u8]) -> Result<Vec<[u8; SIGNATURE_LEN]>, SolError> {
    let (count, offset) = decode_compact_u16(wire)?;
    let end = offset + count as usize * SIGNATURE_LEN;

    let slots = wire.get(offset..end).ok_or_else(|| {
        SolError::SerializationError("transaction too short: signature slots exceed length".into())
    })?;

    Ok(slots
        .chunks_exact(SIGNATURE_LEN)
        .map(|chunk| {
            let mut sig = [0u8; SIGNATURE_LEN];
            sig.copy_from_slice(chunk);
            sig
        })
        .collect())
}

fn to_u8(value: usize, what: &str) -> Result<u8, SolError> {
    u8::try_from(value)
        .map_err(|_| SolError::TransactionBuildError(format!("too many {what}: {value}")))
}
