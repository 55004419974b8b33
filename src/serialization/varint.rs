//! Bitcoin compact-size (VarInt) integers
//!
//! Encoding rules:
//! - value < 0xfd: single byte
//! - value <= 0xffff: 0xfd prefix + 2 bytes (little-endian)
//! - value <= 0xffffffff: 0xfe prefix + 4 bytes (little-endian)
//! - otherwise: 0xff prefix + 8 bytes (little-endian)
//!
//! Decoding rejects non-canonical encodings, as Bitcoin Core does.

use super::reader::ByteReader;
use super::writer::ByteSink;
use crate::error::{ConsensusError, Result};
use std::borrow::Cow;

/// Encoded width of `value` in bytes.
pub fn varint_size(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

pub fn write_varint<S: ByteSink + ?Sized>(sink: &mut S, value: u64) {
    match varint_size(value) {
        1 => sink.write_byte(value as u8),
        3 => {
            sink.write_byte(0xfd);
            sink.write_u16_le(value as u16);
        }
        5 => {
            sink.write_byte(0xfe);
            sink.write_u32_le(value as u32);
        }
        _ => {
            sink.write_byte(0xff);
            sink.write_u64_le(value);
        }
    }
}

/// Encode a u64 value as a compact-size integer
///
/// ```
/// use blvm_primitives::serialization::varint::encode_varint;
///
/// assert_eq!(encode_varint(252), vec![252]);
/// assert_eq!(encode_varint(253), vec![0xfd, 253, 0]);
/// assert_eq!(encode_varint(65536), vec![0xfe, 0, 0, 1, 0]);
/// ```
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut result = Vec::with_capacity(varint_size(value));
    write_varint(&mut result, value);
    result
}

/// Decode a compact-size integer, returning the value and bytes consumed.
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize)> {
    let mut reader = ByteReader::new(data);
    let value = read_varint(&mut reader)?;
    Ok((value, reader.position()))
}

pub fn read_varint(reader: &mut ByteReader<'_>) -> Result<u64> {
    let first = reader.read_byte().ok_or_else(insufficient)?;
    let (value, minimum) = match first {
        0xfd => (reader.read_u16_le().map(u64::from), 0xfd),
        0xfe => (reader.read_u32_le().map(u64::from), 0x1_0000),
        0xff => (reader.read_u64_le(), 0x1_0000_0000),
        byte => return Ok(byte as u64),
    };
    let value = value.ok_or_else(insufficient)?;
    if value < minimum {
        return Err(ConsensusError::Serialization(Cow::Borrowed(
            "Non-canonical VarInt encoding",
        )));
    }
    Ok(value)
}

fn insufficient() -> ConsensusError {
    ConsensusError::Serialization(Cow::Borrowed("Insufficient bytes to decode VarInt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_varint_boundaries() {
        assert_eq!(encode_varint(0), vec![0]);
        assert_eq!(encode_varint(0xfc), vec![0xfc]);
        assert_eq!(encode_varint(0xfd), vec![0xfd, 0xfd, 0]);
        assert_eq!(encode_varint(0xffff), vec![0xfd, 0xff, 0xff]);
        assert_eq!(encode_varint(0x1_0000), vec![0xfe, 0, 0, 1, 0]);
        assert_eq!(
            encode_varint(0x1_0000_0000),
            vec![0xff, 0, 0, 0, 0, 1, 0, 0, 0]
        );
    }

    #[test]
    fn test_decode_varint() {
        assert_eq!(decode_varint(&[252]), Ok((252, 1)));
        assert_eq!(decode_varint(&[0xfd, 0xfd, 0, 0x99]), Ok((253, 3)));
        assert_eq!(decode_varint(&[0xfe, 0, 0, 1, 0]), Ok((65536, 5)));
        assert_eq!(
            decode_varint(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Ok((u64::MAX, 9))
        );
    }

    #[test]
    fn test_decode_varint_insufficient_bytes() {
        assert!(decode_varint(&[]).is_err());
        assert!(decode_varint(&[0xfd, 0]).is_err());
        assert!(decode_varint(&[0xfe, 0, 0, 0]).is_err());
        assert!(decode_varint(&[0xff, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_decode_varint_non_canonical() {
        assert!(decode_varint(&[0xfd, 252, 0]).is_err());
        assert!(decode_varint(&[0xfe, 0xff, 0xff, 0, 0]).is_err());
        assert!(decode_varint(&[0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_size_matches_encoding() {
        for value in [0, 0xfc, 0xfd, 0xffff, 0x1_0000, 0xffff_ffff, u64::MAX] {
            assert_eq!(encode_varint(value).len(), varint_size(value));
        }
    }
}
