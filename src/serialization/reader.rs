//! Bounded byte cursor
//!
//! A failed read never panics: it marks the reader invalid and returns
//! `None`. The reader stays invalid until its position is explicitly reset,
//! which lets the operation codec rewind and recover from a short push.

/// Cursor over a borrowed byte slice with a validity flag.
///
/// Callers bound the reader to exactly the bytes they intend to parse by
/// slicing before construction; the reader never looks past its slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
    valid: bool,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            valid: true,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor (clamped to the end of the slice) and clear any
    /// invalid state.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.data.len());
        self.valid = true;
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True when invalid or when no bytes remain.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        !self.valid || self.position >= self.data.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|[byte]| byte)
    }

    pub fn read_u16_le(&mut self) -> Option<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_u64_le(&mut self) -> Option<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Read exactly `count` bytes. Fewer remaining invalidates the reader
    /// without moving the cursor.
    pub fn read_bytes(&mut self, count: usize) -> Option<&'a [u8]> {
        if !self.valid || count > self.remaining() {
            self.valid = false;
            return None;
        }
        let start = self.position;
        self.position += count;
        Some(&self.data[start..self.position])
    }

    /// Read everything left, possibly nothing.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let start = self.position;
        self.position = self.data.len();
        &self.data[start..]
    }

    /// Advance past `count` bytes; same failure rule as [`Self::read_bytes`].
    pub fn skip(&mut self, count: usize) -> bool {
        self.read_bytes(count).is_some()
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.read_bytes(N)?.try_into().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_reads() {
        let bytes = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_byte(), Some(0x01));
        assert_eq!(reader.read_u16_le(), Some(0x1234));
        assert_eq!(reader.read_u32_le(), Some(0x1234_5678));
        assert!(reader.is_exhausted());
        assert!(reader.is_valid());
    }

    #[test]
    fn test_short_read_invalidates() {
        let bytes = [0xaa, 0xbb];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_bytes(3), None);
        assert!(!reader.is_valid());
        assert!(reader.is_exhausted());
        assert_eq!(reader.position(), 0);
        // Sticky until reset
        assert_eq!(reader.read_byte(), None);
    }

    #[test]
    fn test_set_position_restores_validity() {
        let bytes = [0xaa, 0xbb, 0xcc];
        let mut reader = ByteReader::new(&bytes);
        reader.read_byte();
        reader.invalidate();
        reader.set_position(1);
        assert!(reader.is_valid());
        assert_eq!(reader.read_remaining(), &[0xbb, 0xcc]);
        assert_eq!(reader.read_remaining(), &[] as &[u8]);
    }

    #[test]
    fn test_empty_reader_is_exhausted() {
        let mut reader = ByteReader::new(&[]);
        assert!(reader.is_exhausted());
        assert_eq!(reader.read_bytes(0), Some(&[] as &[u8]));
        assert!(!reader.skip(1));
    }
}
