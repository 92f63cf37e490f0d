//! Error types shared across the crate.

use thiserror::Error;

/// Failure to decode external input (hex numbers, addresses, amounts).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Hex string contained no digits.
    #[error("empty hex number")]
    EmptyHex,
    /// Hex string had an odd number of digits.
    #[error("odd number of hex digits")]
    OddHexLength,
    /// Hex string contained a non-hex character.
    #[error("invalid hex digit '{0}'")]
    InvalidHexDigit(char),
    /// Base64 payload could not be decoded.
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
    /// Friendly address was not 36 bytes after decoding.
    #[error("address must decode to 36 bytes, got {0}")]
    BadAddressLength(usize),
    /// Friendly address carried an unknown tag byte.
    #[error("unknown address tag {0:#04x}")]
    UnknownAddressTag(u8),
    /// Friendly address checksum did not match.
    #[error("address checksum mismatch")]
    BadAddressChecksum,
    /// A chain field expected to fit 64 bits did not.
    #[error("number does not fit in 64 bits")]
    U64Overflow,
    /// Raw `workchain:hex` address was malformed.
    #[error("malformed raw address '{0}'")]
    BadRawAddress(String),
    /// TON amount string was malformed or out of range.
    #[error("malformed TON amount '{0}'")]
    BadAmount(String),
}

/// Failure to encode a message or payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A store would exceed the 1023-bit cell capacity.
    #[error("cell capacity exceeded: {requested} bits requested, {free} free")]
    CellOverflow { requested: usize, free: usize },
    /// A value does not fit the fixed width of its field.
    #[error("value does not fit in a {width}-bit field")]
    FieldOverflow { width: usize },
    /// The encoded payload is too large for a transfer link.
    #[error("encoded payload is {len} characters, limit is {limit}")]
    PayloadTooLarge { len: usize, limit: usize },
}

/// Terminal states of a mining session other than success.
#[derive(Debug, Error)]
pub enum MineError {
    /// The stop flag was raised before a solution was found.
    #[error("mining cancelled before a solution was found")]
    Cancelled,
    /// The caller-imposed attempt cap was reached.
    #[error("no solution within {attempts} attempts")]
    Exhausted { attempts: u64 },
    /// A candidate message failed to encode; never skipped or retried.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
