//! Payment deep links carrying a mined message.

use crate::address::{FriendlyFormat, MsgAddress};
use crate::boc;
use crate::cell::Cell;
use crate::error::{DecodeError, EncodeError};

/// Smallest currency subunit: 1 TON = 10^9 nanoTON.
pub const NANO_PER_TON: u64 = 1_000_000_000;

/// Ceiling on the encoded `bin` parameter; an oversized payload is an
/// error, never a truncated link.
pub const MAX_BIN_PARAM_LEN: usize = 512;

/// Convert a decimal TON amount such as `"0.05"` to nanoTON.
///
/// At most nine fractional digits are meaningful; more is an error, not a
/// rounding.
pub fn to_nano(amount: &str) -> Result<u64, DecodeError> {
    let bad = || DecodeError::BadAmount(amount.to_string());

    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(bad());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }
    if frac.len() > 9 {
        return Err(bad());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| bad())?
    };
    let mut frac_nano: u64 = if frac.is_empty() {
        0
    } else {
        frac.parse().map_err(|_| bad())?
    };
    for _ in frac.len()..9 {
        frac_nano *= 10;
    }

    whole
        .checked_mul(NANO_PER_TON)
        .and_then(|n| n.checked_add(frac_nano))
        .ok_or_else(bad)
}

/// Build the transfer link a wallet can execute:
/// `{scheme}://transfer/{address}?amount={nano}&bin={body}`.
///
/// The destination is rendered bounceable and URL-safe; the body is the
/// serialized container in padding-free base64url.
pub fn transfer_link(
    cell: &Cell,
    to: &MsgAddress,
    amount_nano: u64,
    scheme: &str,
) -> Result<String, EncodeError> {
    let body = boc::to_base64url(cell);
    if body.len() > MAX_BIN_PARAM_LEN {
        return Err(EncodeError::PayloadTooLarge {
            len: body.len(),
            limit: MAX_BIN_PARAM_LEN,
        });
    }

    let address = to.to_friendly(FriendlyFormat {
        bounceable: true,
        test_only: false,
        url_safe: true,
    });

    Ok(format!(
        "{scheme}://transfer/{address}?amount={amount_nano}&bin={body}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::encode_mine_message;
    use crate::message::tests::solved_params;

    #[test]
    fn test_to_nano() {
        assert_eq!(to_nano("0.05").unwrap(), 50_000_000);
        assert_eq!(to_nano("1").unwrap(), 1_000_000_000);
        assert_eq!(to_nano("2.5").unwrap(), 2_500_000_000);
        assert_eq!(to_nano(".5").unwrap(), 500_000_000);
        assert_eq!(to_nano("0.000000001").unwrap(), 1);
    }

    #[test]
    fn test_to_nano_rejects_malformed() {
        for bad in ["", ".", "1.2.3", "-1", "0.0000000001", "1e9", "0,5"] {
            assert!(to_nano(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_link_fixture() {
        let msg = encode_mine_message(&solved_params()).unwrap();
        let collection =
            MsgAddress::parse("EQDk8N7xM5D669LC2YACrseBJtDyFqwtSPCNhRWXU7kjEptX").unwrap();

        let link = transfer_link(&msg.cell, &collection, to_nano("0.05").unwrap(), "ton").unwrap();
        assert_eq!(
            link,
            "ton://transfer/EQDk8N7xM5D669LC2YACrseBJtDyFqwtSPCNhRWXU7kjEptX?amount=50000000&bin=te6ccsEBAQEAfAB8APNNaW5lY-5UNoAZ4vfllNOLcpONvwa-Pf4a3MvXQdPOwKdDgitTbUILQKAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAlb0_sNHu8_b_uwAXKwQ-oqAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAkGA15QI"
        );
    }

    #[test]
    fn test_link_has_no_padding_or_unsafe_chars() {
        let msg = encode_mine_message(&solved_params()).unwrap();
        let collection =
            MsgAddress::parse("EQDk8N7xM5D669LC2YACrseBJtDyFqwtSPCNhRWXU7kjEptX").unwrap();
        let link = transfer_link(&msg.cell, &collection, 1, "ton").unwrap();
        let body = link.split("bin=").nth(1).unwrap();
        assert!(!body.contains('='), "unexpected padding: {body}");
        assert!(!body.contains('+') && !body.contains('/'));
    }
}
