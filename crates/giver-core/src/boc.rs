//! Bag-of-cells serialization for a single-root message cell.
//!
//! Produces the same bytes as the `Cell.toBoc()` default of TON wallet
//! tooling: generic magic, index table, CRC32-C trailer. Only the ref-less
//! single-cell shape the mine message uses is supported.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::cell::Cell;

const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];
const FLAG_HAS_IDX: u8 = 0x80;
const FLAG_HAS_CRC32C: u8 = 0x40;

/// Serialize the cell into a transport container.
pub fn serialize(cell: &Cell) -> Vec<u8> {
    let padded = cell.padded_data();
    let cell_size = 2 + padded.len();

    // One root cell: cell-count fields need one byte, offsets as many as
    // the serialized size needs.
    let size_bytes = 1u8;
    let off_bytes = bytes_needed(cell_size);

    let mut out = Vec::with_capacity(cell_size + 16);
    out.extend_from_slice(&BOC_MAGIC);
    out.push(FLAG_HAS_IDX | FLAG_HAS_CRC32C | size_bytes);
    out.push(off_bytes);
    out.push(1); // cells
    out.push(1); // roots
    out.push(0); // absent
    write_be(&mut out, cell_size as u64, off_bytes);
    out.push(0); // root index
    write_be(&mut out, cell_size as u64, off_bytes); // index: offset past cell 0
    out.extend_from_slice(&cell.descriptors());
    out.extend_from_slice(&padded);

    let crc = crc32c(&out);
    out.extend_from_slice(&crc.to_le_bytes());
    out
}

/// Serialize and render as padding-free base64url, the form a deep link
/// embeds.
pub fn to_base64url(cell: &Cell) -> String {
    URL_SAFE_NO_PAD.encode(serialize(cell))
}

fn bytes_needed(value: usize) -> u8 {
    let mut n = 1;
    while value >> (n * 8) != 0 {
        n += 1;
    }
    n as u8
}

fn write_be(out: &mut Vec<u8>, value: u64, width: u8) {
    for i in (0..width).rev() {
        out.push((value >> (i * 8)) as u8);
    }
}

/// CRC32-C (Castagnoli), reflected, as used by the container trailer.
fn crc32c(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xffff_ffff;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0x82f6_3b78
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::encode_mine_message;
    use crate::message::tests::solved_params;

    const SOLVED_BOC_B64: &str = "te6ccsEBAQEAfAB8APNNaW5lY-5UNoAZ4vfllNOLcpONvwa-Pf4a3MvXQdPOwKdDgitTbUILQKAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAlb0_sNHu8_b_uwAXKwQ-oqAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAkGA15QI";

    #[test]
    fn test_container_fixture() {
        let msg = encode_mine_message(&solved_params()).unwrap();
        let boc = serialize(&msg.cell);

        assert_eq!(boc.len(), 140);
        assert_eq!(&boc[..4], &BOC_MAGIC);
        // has_idx | crc32c | one size byte, then one offset byte
        assert_eq!(boc[4], 0xc1);
        assert_eq!(boc[5], 0x01);
        // 124 serialized cell bytes, recorded in header and index
        assert_eq!(boc[9], 0x7c);
        assert_eq!(boc[11], 0x7c);
        assert_eq!(&boc[136..], &[0x60, 0x35, 0xe5, 0x02]);

        assert_eq!(to_base64url(&msg.cell), SOLVED_BOC_B64);
    }

    #[test]
    fn test_base64url_round_trip() {
        let msg = encode_mine_message(&solved_params()).unwrap();
        let encoded = to_base64url(&msg.cell);
        let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(&encoded)
            .unwrap();
        assert_eq!(decoded, serialize(&msg.cell));
    }

    #[test]
    fn test_crc32c_fixture() {
        // Check value from the CRC catalogue
        assert_eq!(super::crc32c(b"123456789"), 0xe306_9283);
    }

    #[test]
    fn test_small_cell_container() {
        let mut b = crate::cell::CellBuilder::new();
        b.store_uint(0x4d696e65, 32).unwrap();
        let cell = b.build();
        let boc = serialize(&cell);

        // magic(4) flags(1) off(1) cells(1) roots(1) absent(1) size(1)
        // root(1) index(1) d1d2(2) data(4) crc(4)
        assert_eq!(boc.len(), 22);
        assert_eq!(boc[9], 6); // 2 descriptor + 4 data bytes

        let trailer = super::crc32c(&boc[..18]).to_le_bytes();
        assert_eq!(&boc[18..], &trailer);
    }
}
