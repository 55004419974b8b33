//! Transaction component encodings
//!
//! Only the pieces signature hashes commit to: outpoints, outputs and
//! length-prefixed scripts. Format:
//! - Outpoint: hash (32 bytes) + index (4 bytes, little-endian)
//! - Output: value (8 bytes, little-endian) + compact-size script length + script

use super::writer::ByteSink;
use crate::types::{OutPoint, TransactionOutput};

#[inline]
pub fn write_outpoint<S: ByteSink + ?Sized>(sink: &mut S, outpoint: &OutPoint) {
    sink.write_bytes(&outpoint.hash);
    sink.write_u32_le(outpoint.index);
}

/// Compact-size length followed by the bytes.
#[inline]
pub fn write_prefixed_bytes<S: ByteSink + ?Sized>(sink: &mut S, bytes: &[u8]) {
    sink.write_varint(bytes.len() as u64);
    sink.write_bytes(bytes);
}

#[inline]
pub fn write_output<S: ByteSink + ?Sized>(sink: &mut S, output: &TransactionOutput) {
    sink.write_u64_le(output.value);
    write_prefixed_bytes(sink, &output.script_pubkey);
}

pub fn serialize_output(output: &TransactionOutput) -> Vec<u8> {
    let mut result = Vec::with_capacity(9 + output.script_pubkey.len());
    write_output(&mut result, output);
    result
}
