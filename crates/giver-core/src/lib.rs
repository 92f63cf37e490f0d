//! Proof-of-work mining core for the TON NFT giver contract.
//!
//! This crate provides pure Rust implementations of:
//! - Big-endian hex/byte conversions for chain-supplied big integers
//! - TON address parsing and friendly-form rendering with CRC16 checksums
//! - Bit-level cell construction and the cell representation hash
//! - The giver's mine-message layout
//! - The nonce search loop, single-threaded and multi-worker
//! - Bag-of-cells serialization and `ton://transfer` deep links

pub mod address;
pub mod bignum;
pub mod boc;
pub mod cell;
pub mod deeplink;
pub mod error;
pub mod message;
pub mod mine;

pub use address::{FriendlyFormat, MsgAddress};
pub use bignum::{biguint_from_bytes_be, biguint_from_hex, to_decimal_string, u64_from_hex};
pub use cell::{Cell, CellBuilder};
pub use deeplink::{to_nano, transfer_link};
pub use error::{DecodeError, EncodeError, MineError};
pub use message::{encode_mine_message, MineMessage, MineParams, OP_MINE};
pub use mine::{
    mine, mine_parallel, unix_now, MineConfig, MineOutcome, MiningData, NoProgress,
    ProgressObserver,
};
