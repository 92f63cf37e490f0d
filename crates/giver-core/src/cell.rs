//! Bit-level construction and hashing of a TON data cell.
//!
//! The mine message fits a single cell with no references, so this module
//! implements exactly that subset: up to 1023 data bits, completion-tag
//! padding, and the representation hash the giver contract checks the
//! proof-of-work against.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::address::MsgAddress;
use crate::error::EncodeError;

/// Maximum number of data bits in a cell.
pub const MAX_DATA_BITS: usize = 1023;

/// An immutable cell: raw data bits plus their count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
}

impl Cell {
    /// Number of data bits stored.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Raw data bytes; bits past `bit_len` in the last byte are zero.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The two descriptor bytes: reference count and data-size byte.
    ///
    /// d2 encodes `floor(bits/8) + ceil(bits/8)`, so an odd value marks an
    /// incomplete last byte.
    pub fn descriptors(&self) -> [u8; 2] {
        let d2 = (self.bit_len / 8 + (self.bit_len + 7) / 8) as u8;
        [0, d2]
    }

    /// Data bytes with the completion tag applied.
    ///
    /// When the bit count is not a multiple of 8, a single `1` bit follows
    /// the data, then zeros to the byte boundary.
    pub fn padded_data(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        let rem = self.bit_len % 8;
        if rem != 0 {
            let last = out.len() - 1;
            out[last] |= 1 << (7 - rem);
        }
        out
    }

    /// The representation hash: SHA-256 over descriptors plus padded data.
    ///
    /// This is the value the mining loop compares against the complexity
    /// bound.
    pub fn repr_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.descriptors());
        hasher.update(self.padded_data());
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }

    /// The representation hash as an unsigned big-endian magnitude.
    pub fn repr_hash_uint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.repr_hash())
    }
}

/// Append-only bit writer producing a [`Cell`].
#[derive(Debug, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits still available before the cell is full.
    pub fn free_bits(&self) -> usize {
        MAX_DATA_BITS - self.bit_len
    }

    fn ensure(&mut self, bits: usize) -> Result<(), EncodeError> {
        if bits > self.free_bits() {
            return Err(EncodeError::CellOverflow {
                requested: bits,
                free: self.free_bits(),
            });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 1 << (7 - self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Store a single bit.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, EncodeError> {
        self.ensure(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Store `value` as a big-endian unsigned field of `bits` width.
    ///
    /// Widths above 64 are zero-extended on the left; a value that does not
    /// fit a narrower width is an error, never a truncation.
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self, EncodeError> {
        if bits < 64 && value >> bits != 0 {
            return Err(EncodeError::FieldOverflow { width: bits });
        }
        self.ensure(bits)?;
        for i in (0..bits).rev() {
            let bit = if i < 64 { value >> i & 1 == 1 } else { false };
            self.push_bit(bit);
        }
        Ok(self)
    }

    /// Store a big integer as a big-endian unsigned field of `bits` width.
    pub fn store_biguint(&mut self, value: &BigUint, bits: usize) -> Result<&mut Self, EncodeError> {
        if value.bits() > bits as u64 {
            return Err(EncodeError::FieldOverflow { width: bits });
        }
        self.ensure(bits)?;
        for i in (0..bits as u64).rev() {
            self.push_bit(value.bit(i));
        }
        Ok(self)
    }

    /// Store an internal address: `10` tag, no anycast, workchain, hash.
    pub fn store_address(&mut self, addr: &MsgAddress) -> Result<&mut Self, EncodeError> {
        self.ensure(267)?;
        self.store_uint(0b10, 2)?;
        self.store_bit(false)?;
        self.store_uint(addr.workchain as u8 as u64, 8)?;
        for byte in addr.hash {
            self.store_uint(byte as u64, 8)?;
        }
        Ok(self)
    }

    /// Finish writing and freeze the cell.
    pub fn build(self) -> Cell {
        Cell {
            data: self.data,
            bit_len: self.bit_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_aligned_data() {
        let mut b = CellBuilder::new();
        b.store_uint(0x4d696e65, 32).unwrap();
        let cell = b.build();

        assert_eq!(cell.bit_len(), 32);
        assert_eq!(cell.data(), &[0x4d, 0x69, 0x6e, 0x65]);
        // 4 + 4 data bytes, complete last byte: no completion tag
        assert_eq!(cell.descriptors(), [0, 8]);
        assert_eq!(cell.padded_data(), cell.data());
    }

    #[test]
    fn test_completion_tag() {
        let mut b = CellBuilder::new();
        b.store_uint(0b101, 3).unwrap();
        let cell = b.build();

        assert_eq!(cell.bit_len(), 3);
        // Data bits 101, tag bit, zeros: 1011_0000
        assert_eq!(cell.padded_data(), &[0xb0]);
        assert_eq!(cell.descriptors(), [0, 1]);
    }

    #[test]
    fn test_uint_field_overflow() {
        let mut b = CellBuilder::new();
        assert_eq!(
            b.store_uint(0x1ff, 8).unwrap_err(),
            EncodeError::FieldOverflow { width: 8 }
        );
    }

    #[test]
    fn test_wide_uint_zero_extension() {
        let mut b = CellBuilder::new();
        b.store_uint(4, 256).unwrap();
        let cell = b.build();

        assert_eq!(cell.bit_len(), 256);
        let mut expected = vec![0u8; 32];
        expected[31] = 4;
        assert_eq!(cell.data(), expected.as_slice());
    }

    #[test]
    fn test_biguint_field() {
        let seed = BigUint::parse_bytes(b"ade9fd868f779fb7fdd800b95821f515", 16).unwrap();
        let mut b = CellBuilder::new();
        b.store_biguint(&seed, 128).unwrap();
        let cell = b.build();

        assert_eq!(
            hex::encode(cell.data()),
            "ade9fd868f779fb7fdd800b95821f515"
        );

        // 129 bits never fit a 128-bit field
        let wide = BigUint::from(1u8) << 128u32;
        let mut b = CellBuilder::new();
        assert_eq!(
            b.store_biguint(&wide, 128).unwrap_err(),
            EncodeError::FieldOverflow { width: 128 }
        );
    }

    #[test]
    fn test_capacity_limit() {
        let mut b = CellBuilder::new();
        for _ in 0..15 {
            b.store_uint(0, 64).unwrap();
        }
        // 960 bits used, 63 free
        assert_eq!(b.free_bits(), 63);
        assert!(b.store_uint(0, 64).is_err());
        b.store_uint(0, 63).unwrap();
        assert_eq!(b.free_bits(), 0);
    }

    #[test]
    fn test_repr_hash_is_deterministic() {
        let build = || {
            let mut b = CellBuilder::new();
            b.store_uint(0xdeadbeef, 32).unwrap();
            b.store_uint(7, 5).unwrap();
            b.build()
        };
        assert_eq!(build().repr_hash(), build().repr_hash());
    }
}
