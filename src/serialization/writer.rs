//! Byte sinks
//!
//! Encoders write through [`ByteSink`] so the same code produces a wire
//! buffer or streams straight into a hash engine without an intermediate
//! allocation.

use sha2::{Digest, Sha256};

pub trait ByteSink {
    fn write_bytes(&mut self, bytes: &[u8]);

    #[inline]
    fn write_byte(&mut self, byte: u8) {
        self.write_bytes(&[byte]);
    }

    #[inline]
    fn write_u16_le(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    #[inline]
    fn write_u32_le(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    #[inline]
    fn write_u64_le(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Compact-size (Bitcoin VarInt) encoding of `value`.
    #[inline]
    fn write_varint(&mut self, value: u64) {
        super::varint::write_varint(self, value);
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl ByteSink for Sha256 {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        Digest::update(self, bytes);
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }
}
