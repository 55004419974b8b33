//! Bitcoin wire format primitives
//!
//! Bounded byte reading, a byte sink shared by buffers and hash engines,
//! compact-size integers and the outpoint/output encodings committed to by
//! signature hashes. All integers are little-endian.

pub mod reader;
pub mod transaction;
pub mod varint;
pub mod writer;

pub use reader::ByteReader;
pub use transaction::{serialize_output, write_outpoint, write_output, write_prefixed_bytes};
pub use varint::{decode_varint, encode_varint, varint_size, write_varint};
pub use writer::ByteSink;
