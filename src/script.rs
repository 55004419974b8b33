//! Scripts as ordered operations
//!
//! A [`Script`] is the parsed form of script bytes plus an execution cursor.
//! Parsing never fails: malformed trailing bytes become a single underflow
//! operation, so every byte string round-trips exactly.

use crate::error::{ConsensusError, Result};
use crate::operation::Operation;
use crate::serialization::{ByteReader, ByteSink};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered operations with a cursor marking the operation being evaluated.
///
/// The cursor is execution state: it does not take part in equality and is
/// not serialized.
#[derive(Debug, Clone, Default)]
pub struct Script {
    ops: Vec<Operation>,
    offset: usize,
}

impl Script {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops, offset: 0 }
    }

    /// Parse raw script bytes (no length prefix).
    pub fn from_data(bytes: &[u8]) -> Self {
        let mut reader = ByteReader::new(bytes);
        let mut ops = Vec::new();
        while !reader.is_exhausted() {
            ops.push(Operation::from_reader(&mut reader));
        }
        Self::new(ops)
    }

    /// Parse whitespace-separated mnemonic tokens.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMnemonic` naming the first token that does not parse.
    pub fn from_mnemonic(text: &str) -> Result<Self> {
        let ops = text
            .split_whitespace()
            .map(|token| {
                let op = Operation::from_mnemonic(token);
                if op.is_valid() {
                    Ok(op)
                } else {
                    Err(ConsensusError::InvalidMnemonic(token.to_string().into()))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(ops))
    }

    #[inline]
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Index of the current operation.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the cursor, clamped to one past the last operation.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.ops.len());
    }

    /// False if any operation is the invalid operation.
    pub fn is_valid(&self) -> bool {
        self.ops.iter().all(Operation::is_valid)
    }

    /// True if parsing ended in a truncated push.
    pub fn is_underflow(&self) -> bool {
        self.ops.last().is_some_and(Operation::is_underflow)
    }

    /// Serialized length, including the compact-size length when `prefix`.
    pub fn serialized_size(&self, prefix: bool) -> usize {
        let size = self.ops.iter().map(Operation::serialized_size).sum::<usize>();
        if prefix {
            crate::serialization::varint_size(size as u64) + size
        } else {
            size
        }
    }

    /// Serialize into `sink`, optionally preceded by the compact-size length.
    ///
    /// # Errors
    ///
    /// Fails before writing anything if the script holds an invalid
    /// operation. A push whose data overflows its length prefix fails at
    /// that operation.
    pub fn write_to<S: ByteSink + ?Sized>(&self, sink: &mut S, prefix: bool) -> Result<()> {
        if !self.is_valid() {
            return Err(ConsensusError::InvalidOperation);
        }
        if prefix {
            sink.write_varint(self.serialized_size(false) as u64);
        }
        for op in &self.ops {
            op.write_to(sink)?;
        }
        Ok(())
    }

    pub fn to_data(&self, prefix: bool) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.serialized_size(prefix));
        self.write_to(&mut out, prefix)?;
        Ok(out)
    }
}

impl PartialEq for Script {
    fn eq(&self, other: &Self) -> bool {
        self.ops == other.ops
    }
}

impl Eq for Script {}

impl From<Vec<Operation>> for Script {
    fn from(ops: Vec<Operation>) -> Self {
        Self::new(ops)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Script {
    type Err = ConsensusError;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_mnemonic(text)
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Script::from_mnemonic(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::*;

    fn p2pkh_bytes() -> Vec<u8> {
        let mut bytes = vec![OP_DUP, OP_HASH160, 0x14];
        bytes.extend_from_slice(&[0x11; 20]);
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        bytes
    }

    #[test]
    fn test_parse_p2pkh() {
        let script = Script::from_data(&p2pkh_bytes());
        assert_eq!(script.len(), 5);
        assert_eq!(script.ops()[2].data(), &[0x11; 20]);
        assert!(script.is_valid());
        assert!(!script.is_underflow());
        assert_eq!(script.to_data(false).unwrap(), p2pkh_bytes());
    }

    #[test]
    fn test_prefixed_serialization() {
        let script = Script::from_data(&p2pkh_bytes());
        let prefixed = script.to_data(true).unwrap();
        assert_eq!(prefixed[0], 25);
        assert_eq!(&prefixed[1..], &p2pkh_bytes()[..]);
        assert_eq!(script.serialized_size(true), 26);
    }

    #[test]
    fn test_trailing_underflow() {
        let bytes = [OP_1, OP_PUSHDATA1, 0x05, 0x01, 0x02];
        let script = Script::from_data(&bytes);
        assert_eq!(script.len(), 2);
        assert!(script.is_underflow());
        assert_eq!(
            script.ops()[1],
            Operation::from_underflow(&[OP_PUSHDATA1, 0x05, 0x01, 0x02])
        );
        assert_eq!(script.to_data(false).unwrap(), bytes.to_vec());
        assert_eq!(script.to_string(), "1 <4c050102>");
    }

    #[test]
    fn test_empty_script() {
        let script = Script::from_data(&[]);
        assert!(script.is_empty());
        assert_eq!(script.to_data(true).unwrap(), vec![0x00]);
        assert_eq!(script.to_string(), "");
        assert_eq!(Script::from_mnemonic("  ").unwrap(), script);
    }

    #[test]
    fn test_mnemonic_round_trip() {
        let script = Script::from_data(&p2pkh_bytes());
        let text = script.to_string();
        assert_eq!(
            text,
            format!("dup hash160 [{}] equalverify checksig", "11".repeat(20))
        );
        assert_eq!(Script::from_mnemonic(&text).unwrap(), script);
    }

    #[test]
    fn test_invalid_token_rejects_script() {
        assert_eq!(
            Script::from_mnemonic("dup frobnicate checksig"),
            Err(ConsensusError::InvalidMnemonic("frobnicate".into()))
        );
    }

    #[test]
    fn test_invalid_operation_blocks_serialization() {
        let script = Script::new(vec![Operation::from_code(OP_DUP), Operation::default()]);
        assert!(!script.is_valid());
        let mut sink = Vec::new();
        assert_eq!(
            script.write_to(&mut sink, true),
            Err(ConsensusError::InvalidOperation)
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_offset_is_clamped_and_ignored_by_equality() {
        let mut script = Script::from_data(&[OP_CODESEPARATOR, OP_CHECKSIG]);
        script.set_offset(10);
        assert_eq!(script.offset(), 2);
        assert_eq!(script, Script::from_data(&[OP_CODESEPARATOR, OP_CHECKSIG]));
    }
}
