//! TON address parsing and user-friendly rendering.
//!
//! Supports:
//! - Raw form: `workchain:hex`, e.g. `0:cf17bf2c...`
//! - Friendly form: 36 bytes (tag, workchain, 32-byte hash, CRC16) in base64
//!   or base64url, e.g. `EQDk8N7xM5D669LC2YACrseBJtDyFqwtSPCNhRWXU7kjEptX`
//!
//! The tag byte carries the bounceable flag (0x11 bounceable, 0x51 not) and
//! a testnet-only marker (0x80 set on top of either).

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;

use crate::error::DecodeError;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TEST_ONLY: u8 = 0x80;

/// A raw internal address: workchain plus 256-bit account hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsgAddress {
    pub workchain: i8,
    pub hash: [u8; 32],
}

/// Rendering options for [`MsgAddress::to_friendly`].
#[derive(Debug, Clone, Copy)]
pub struct FriendlyFormat {
    pub bounceable: bool,
    pub test_only: bool,
    pub url_safe: bool,
}

impl Default for FriendlyFormat {
    fn default() -> Self {
        FriendlyFormat {
            bounceable: true,
            test_only: false,
            url_safe: true,
        }
    }
}

impl MsgAddress {
    /// Parse either address form; the friendly form's flags are validated
    /// and discarded.
    pub fn parse(s: &str) -> Result<Self, DecodeError> {
        if s.contains(':') {
            Self::parse_raw(s)
        } else {
            Self::parse_friendly(s)
        }
    }

    /// Parse the `workchain:hex` form.
    pub fn parse_raw(s: &str) -> Result<Self, DecodeError> {
        let bad = || DecodeError::BadRawAddress(s.to_string());

        let (wc, hash_hex) = s.split_once(':').ok_or_else(bad)?;
        let workchain: i8 = wc.parse().map_err(|_| bad())?;

        let bytes = hex::decode(hash_hex).map_err(|_| bad())?;
        let hash: [u8; 32] = bytes.try_into().map_err(|_| bad())?;

        Ok(MsgAddress { workchain, hash })
    }

    /// Parse the 48-character friendly form, either alphabet.
    pub fn parse_friendly(s: &str) -> Result<Self, DecodeError> {
        let engine = if s.contains('-') || s.contains('_') {
            URL_SAFE_NO_PAD
        } else {
            STANDARD_NO_PAD
        };
        let bytes = engine
            .decode(s.trim_end_matches('='))
            .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;

        if bytes.len() != 36 {
            return Err(DecodeError::BadAddressLength(bytes.len()));
        }

        let tag = bytes[0] & !TAG_TEST_ONLY;
        if tag != TAG_BOUNCEABLE && tag != TAG_NON_BOUNCEABLE {
            return Err(DecodeError::UnknownAddressTag(bytes[0]));
        }

        let expected = crc16_xmodem(&bytes[..34]);
        let actual = u16::from_be_bytes([bytes[34], bytes[35]]);
        if expected != actual {
            return Err(DecodeError::BadAddressChecksum);
        }

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);

        Ok(MsgAddress {
            workchain: bytes[1] as i8,
            hash,
        })
    }

    /// Render the friendly form. Payment links require the bounceable,
    /// URL-safe variant, which is also the default.
    pub fn to_friendly(&self, format: FriendlyFormat) -> String {
        let mut tag = if format.bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if format.test_only {
            tag |= TAG_TEST_ONLY;
        }

        let mut bytes = [0u8; 36];
        bytes[0] = tag;
        bytes[1] = self.workchain as u8;
        bytes[2..34].copy_from_slice(&self.hash);
        let crc = crc16_xmodem(&bytes[..34]);
        bytes[34..36].copy_from_slice(&crc.to_be_bytes());

        if format.url_safe {
            URL_SAFE_NO_PAD.encode(bytes)
        } else {
            STANDARD_NO_PAD.encode(bytes)
        }
    }

    /// Render the raw `workchain:hex` form.
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl core::fmt::Display for MsgAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_friendly(FriendlyFormat::default()))
    }
}

/// CRC16/XMODEM over the tag, workchain and hash bytes.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
