//! The giver contract's mine-message layout and content hash.

use num_bigint::BigUint;

use crate::address::MsgAddress;
use crate::cell::{Cell, CellBuilder};
use crate::error::EncodeError;

/// Operation tag of a mine request: ASCII "Mine".
pub const OP_MINE: u32 = 0x4d69_6e65;

/// Bit width of the nonce field.
pub const NONCE_BITS: usize = 256;

/// Bit width of the seed field.
pub const SEED_BITS: usize = 128;

/// Mutable state of one mining candidate.
///
/// `expire` and `nonce` change between attempts; `recipient` and `seed` are
/// fixed for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineParams {
    /// Unix timestamp after which the message is no longer accepted.
    pub expire: u32,
    /// Address the minted item is sent to.
    pub recipient: MsgAddress,
    /// Counter varied by the search; serialized as a 256-bit field.
    pub nonce: u64,
    /// Per-epoch contract seed; must fit 128 bits.
    pub seed: BigUint,
}

/// An encoded candidate: the cell and its representation hash.
#[derive(Debug, Clone)]
pub struct MineMessage {
    pub cell: Cell,
    pub hash: BigUint,
}

/// Serialize a candidate into the contract's expected layout.
///
/// The nonce is written twice, before and after the seed, exactly as the
/// giver expects:
///
/// ```text
/// op(32) | expire(32) | recipient(267) | nonce(256) | seed(128) | nonce(256)
/// ```
///
/// Identical parameters always produce identical bytes and an identical
/// hash.
pub fn encode_mine_message(params: &MineParams) -> Result<MineMessage, EncodeError> {
    let mut builder = CellBuilder::new();
    builder.store_uint(OP_MINE as u64, 32)?;
    builder.store_uint(params.expire as u64, 32)?;
    builder.store_address(&params.recipient)?;
    builder.store_uint(params.nonce, NONCE_BITS)?;
    builder.store_biguint(&params.seed, SEED_BITS)?;
    builder.store_uint(params.nonce, NONCE_BITS)?;

    let cell = builder.build();
    let hash = cell.repr_hash_uint();
    Ok(MineMessage { cell, hash })
}
