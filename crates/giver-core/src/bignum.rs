//! Big-endian conversions for chain-supplied big integers.
//!
//! The giver contract reports complexity and seed as hex numbers wider than
//! any machine integer, and the message hash is a 256-bit value. All three
//! are handled as `BigUint`, so comparisons are magnitude comparisons no
//! matter how many leading zero bytes an input carried.

use num_bigint::BigUint;

use crate::error::DecodeError;

/// Parse a big-endian hex number, with or without a `0x` prefix.
pub fn biguint_from_hex(s: &str) -> Result<BigUint, DecodeError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.is_empty() {
        return Err(DecodeError::EmptyHex);
    }

    let bytes = hex::decode(digits).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, .. } => DecodeError::InvalidHexDigit(c),
        _ => DecodeError::OddHexLength,
    })?;

    Ok(BigUint::from_bytes_be(&bytes))
}

/// Interpret a byte slice as an unsigned big-endian magnitude.
///
/// Empty input is zero.
pub fn biguint_from_bytes_be(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Render a big integer in decimal, the form wallets and explorers display.
pub fn to_decimal_string(value: &BigUint) -> String {
    value.to_str_radix(10)
}

/// Parse a u64 chain field given as hex (the `get_mining_data` stack format).
pub fn u64_from_hex(s: &str) -> Result<u64, DecodeError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.is_empty() {
        return Err(DecodeError::EmptyHex);
    }

    u64::from_str_radix(digits, 16).map_err(|_| {
        match digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            Some(c) => DecodeError::InvalidHexDigit(c),
            None => DecodeError::U64Overflow,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_bytes_agree() {
        // Leading zero bytes do not change the magnitude
        let from_hex = biguint_from_hex("0x00ff").unwrap();
        let from_bytes = biguint_from_bytes_be(&[0xff]);
        assert_eq!(from_hex, from_bytes);
    }

    #[test]
    fn test_decimal_rendering() {
        // target_delta from a real get_mining_data response
        let n = biguint_from_hex("0x1e").unwrap();
        assert_eq!(to_decimal_string(&n), "30");

        let zero = biguint_from_bytes_be(&[]);
        assert_eq!(to_decimal_string(&zero), "0");
    }

    #[test]
    fn test_magnitude_comparison() {
        let small = biguint_from_hex("0x00000001").unwrap();
        let large = biguint_from_hex("0xff").unwrap();
        assert!(small < large);
        assert!(large >= small);

        // Different byte lengths, same magnitude
        assert_eq!(
            biguint_from_hex("0x0000000000ab").unwrap(),
            biguint_from_hex("0xab").unwrap()
        );
    }

    #[test]
    fn test_complexity_fixture() {
        let complexity =
            biguint_from_hex("0x3a1bdcd7634874b38fcc3d78cab1d65d624c97f36dba09c30dbdaec1495f2e5")
                .unwrap();
        assert_eq!(
            to_decimal_string(&complexity),
            "1642710892476188609570721362948968264331333457511842233832010214392389300965"
        );
    }

    #[test]
    fn test_malformed_hex() {
        assert_eq!(biguint_from_hex("0xf"), Err(DecodeError::OddHexLength));
        assert_eq!(
            biguint_from_hex("0xzz"),
            Err(DecodeError::InvalidHexDigit('z'))
        );
        assert_eq!(biguint_from_hex(""), Err(DecodeError::EmptyHex));
        assert_eq!(biguint_from_hex("0x"), Err(DecodeError::EmptyHex));
    }

    #[test]
    fn test_u64_from_hex() {
        assert_eq!(u64_from_hex("0x63ec563b").unwrap(), 1676432955);
        assert_eq!(u64_from_hex("ab").unwrap(), 171);
        assert!(u64_from_hex("0xgg").is_err());
    }
}
