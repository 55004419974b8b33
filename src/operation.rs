//! Script operation codec
//!
//! An [`Operation`] is one script token: an opcode with its push data, an
//! underflow token holding the raw tail of a script whose final push claims
//! more bytes than remain, or the invalid operation.
//!
//! Underflow tokens exist because a script that cannot execute (for example
//! a coinbase input script) must still serialize and hash byte-for-byte.
//! They report [`INVALID_OPCODE`] as their code and serialize as their raw
//! bytes only.
//!
//! Reference: Bitcoin Core `CScript::GetOp`, libbitcoin `chain::operation`

use crate::constants::{INVALID_OPCODE, INVALID_OPERATION_DATA, MAX_BLOCK_SIZE};
use crate::error::{ConsensusError, Result};
use crate::opcodes::{
    self, opcode_from_data, opcode_from_mnemonic, opcode_from_size, opcode_to_mnemonic,
    OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4,
};
use crate::serialization::{ByteReader, ByteSink};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// One parsed script token. Push data is shared and never mutated, so
/// clones are cheap. Equality compares data by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// An opcode and the data it pushes (empty for non-push opcodes).
    Op { code: u8, data: Arc<[u8]> },
    /// Trailing bytes of a truncated push, kept verbatim.
    Underflow(Arc<[u8]>),
    /// The sentinel opcode with push data, which has no wire form.
    Invalid(Arc<[u8]>),
}

impl Default for Operation {
    /// The invalid operation.
    fn default() -> Self {
        Operation::Invalid(Arc::from(&INVALID_OPERATION_DATA[..]))
    }
}

impl Operation {
    /// Assemble an operation from its parts. The sentinel opcode with
    /// non-empty data is the one invalid combination.
    pub fn new(code: u8, data: &[u8]) -> Self {
        let data: Arc<[u8]> = Arc::from(data);
        if code == INVALID_OPCODE && !data.is_empty() {
            Operation::Invalid(data)
        } else {
            Operation::Op { code, data }
        }
    }

    /// An operation carrying no push data.
    pub fn from_code(code: u8) -> Self {
        Operation::Op {
            code,
            data: Arc::from(&[][..]),
        }
    }

    /// The operation pushing `data`.
    ///
    /// With `minimal` set, single-byte data equal to -1 or 1..=16 becomes
    /// the numeric opcode and the data is dropped. Otherwise the smallest
    /// size class that fits is used.
    pub fn from_push_data(data: &[u8], minimal: bool) -> Self {
        let code = opcode_from_data(data, minimal);
        if opcodes::is_payload(code) {
            Operation::Op {
                code,
                data: Arc::from(data),
            }
        } else {
            Operation::from_code(code)
        }
    }

    pub fn from_underflow(data: &[u8]) -> Self {
        Operation::Underflow(Arc::from(data))
    }

    /// Deserialize the first operation in `bytes`.
    pub fn from_data(bytes: &[u8]) -> Self {
        Self::from_reader(&mut ByteReader::new(bytes))
    }

    /// Deserialize one operation.
    ///
    /// Never fails. A push claiming more bytes than remain rewinds to the
    /// opcode and returns everything left as an underflow token, so the
    /// reader must be bounded to the script's bytes. A reader that is
    /// already exhausted yields the sentinel opcode with no data.
    pub fn from_reader(reader: &mut ByteReader<'_>) -> Self {
        if reader.is_exhausted() {
            return Operation::from_code(INVALID_OPCODE);
        }

        let start = reader.position();
        let code = reader.read_byte().unwrap_or(INVALID_OPCODE);
        let size = read_data_size(code, reader);

        // Bound allocation regardless of what a corrupt length claims.
        if size > MAX_BLOCK_SIZE {
            reader.invalidate();
        }

        if let Some(data) = reader.read_bytes(size) {
            return Operation::Op {
                code,
                data: Arc::from(data),
            };
        }

        reader.set_position(start);
        let remaining = reader.read_remaining();
        trace!(
            position = start,
            code,
            claimed = size,
            available = remaining.len(),
            "push data underflow"
        );
        Operation::Underflow(Arc::from(remaining))
    }

    /// Parse a mnemonic token:
    /// - `[hex]` nominal push, `[N.hex]` push with explicit width N in {0,1,2,4}
    /// - `'text'` push of the text bytes
    /// - `<hex>` underflow token
    /// - an opcode name, or a decimal integer pushed as a script number
    ///
    /// Anything else yields the invalid operation.
    pub fn from_mnemonic(token: &str) -> Self {
        parse_mnemonic(token).unwrap_or_default()
    }

    /// Advance past one operation without materializing its data. Returns
    /// false if the reader was already exhausted.
    pub fn count_op(reader: &mut ByteReader<'_>) -> bool {
        if reader.is_exhausted() {
            return false;
        }
        let code = reader.read_byte().unwrap_or(INVALID_OPCODE);
        let size = read_data_size(code, reader);
        reader.skip(size);
        true
    }

    /// The opcode, [`INVALID_OPCODE`] for underflow and invalid operations.
    #[inline]
    pub fn code(&self) -> u8 {
        match self {
            Operation::Op { code, .. } => *code,
            Operation::Underflow(_) | Operation::Invalid(_) => INVALID_OPCODE,
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        match self {
            Operation::Op { data, .. } | Operation::Underflow(data) | Operation::Invalid(data) => {
                &data[..]
            }
        }
    }

    /// Shared handle to the data buffer.
    pub fn data_shared(&self) -> Arc<[u8]> {
        match self {
            Operation::Op { data, .. } | Operation::Underflow(data) | Operation::Invalid(data) => {
                Arc::clone(data)
            }
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Operation::Invalid(_))
    }

    #[inline]
    pub fn is_underflow(&self) -> bool {
        matches!(self, Operation::Underflow(_))
    }

    /// True for push opcodes (including OP_0 and numeric pushes).
    #[inline]
    pub fn is_push(&self) -> bool {
        matches!(self, Operation::Op { code, .. } if opcodes::is_push(*code))
    }

    /// Bytes written by [`Self::write_to`].
    pub fn serialized_size(&self) -> usize {
        match self {
            Operation::Op { code, data } => 1 + opcodes::push_prefix_width(*code) + data.len(),
            Operation::Underflow(data) | Operation::Invalid(data) => data.len(),
        }
    }

    /// Serialize into `sink`. Nothing is written on error.
    ///
    /// # Errors
    ///
    /// The invalid operation has no wire form, and push data longer than
    /// its length prefix can express is refused rather than truncated.
    pub fn write_to<S: ByteSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let (code, data) = match self {
            Operation::Underflow(data) => {
                sink.write_bytes(data);
                return Ok(());
            }
            Operation::Invalid(_) => return Err(ConsensusError::InvalidOperation),
            Operation::Op { code, data } => (*code, data),
        };

        let overflow = || ConsensusError::PushSizeOverflow {
            code,
            size: data.len(),
        };
        match code {
            OP_PUSHDATA1 => {
                let size = u8::try_from(data.len()).map_err(|_| overflow())?;
                sink.write_byte(code);
                sink.write_byte(size);
            }
            OP_PUSHDATA2 => {
                let size = u16::try_from(data.len()).map_err(|_| overflow())?;
                sink.write_byte(code);
                sink.write_u16_le(size);
            }
            OP_PUSHDATA4 => {
                let size = u32::try_from(data.len()).map_err(|_| overflow())?;
                sink.write_byte(code);
                sink.write_u32_le(size);
            }
            _ => sink.write_byte(code),
        }
        sink.write_bytes(data);
        Ok(())
    }

    pub fn to_data(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.serialized_size());
        self.write_to(&mut out)?;
        Ok(out)
    }
}

/// Push-data length implied by `code`, reading the little-endian length
/// prefix when there is one. A short prefix invalidates the reader.
fn read_data_size(code: u8, reader: &mut ByteReader<'_>) -> usize {
    match code {
        OP_PUSHDATA1 => reader.read_byte().map_or(0, usize::from),
        OP_PUSHDATA2 => reader.read_u16_le().map_or(0, usize::from),
        OP_PUSHDATA4 => reader.read_u32_le().map_or(0, |size| size as usize),
        _ => opcodes::implied_push_size(code).unwrap_or(0),
    }
}

fn delimited(token: &str, open: char, close: char) -> Option<&str> {
    if token.len() < 2 {
        return None;
    }
    token.strip_prefix(open)?.strip_suffix(close)
}

fn parse_mnemonic(token: &str) -> Option<Operation> {
    if let Some(inner) = delimited(token, '[', ']') {
        return parse_push_token(inner);
    }

    if let Some(text) = delimited(token, '\'', '\'') {
        let data = text.as_bytes();
        return Some(Operation::new(opcodes::nominal_opcode_from_data(data), data));
    }

    if let Some(raw) = delimited(token, '<', '>') {
        let data = hex::decode(raw).ok()?;
        return Some(Operation::Underflow(data.into()));
    }

    if let Some(code) = opcode_from_mnemonic(token) {
        // Push opcodes named bare carry no data.
        return Some(Operation::from_code(code));
    }

    let value = parse_decimal(token)?;
    let data = opcodes::push_data_from_integer(value);
    Some(Operation::new(opcodes::nominal_opcode_from_data(&data), &data))
}

fn parse_push_token(inner: &str) -> Option<Operation> {
    let mut parts = inner.split('.');
    let (prefix, hex_data) = match (parts.next(), parts.next(), parts.next()) {
        (Some(hex_data), None, None) => (None, hex_data),
        (Some(prefix), Some(hex_data), None) => (Some(prefix), hex_data),
        _ => return None,
    };

    let data = hex::decode(hex_data).ok()?;
    let size = data.len();
    let code = match prefix {
        None => opcode_from_size(size),
        Some("0") if size <= opcodes::OP_PUSHBYTES_75 as usize => opcode_from_size(size),
        Some("1") if size <= u8::MAX as usize => OP_PUSHDATA1,
        Some("2") if size <= u16::MAX as usize => OP_PUSHDATA2,
        Some("4") if u32::try_from(size).is_ok() => OP_PUSHDATA4,
        Some(_) => return None,
    };
    Some(Operation::new(code, &data))
}

/// Optional leading '-' followed by ASCII digits only.
fn parse_decimal(token: &str) -> Option<i64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn width_prefix(code: u8, size: usize) -> &'static str {
    if code == opcode_from_size(size) {
        return "";
    }
    match code {
        OP_PUSHDATA1 => "1.",
        OP_PUSHDATA2 => "2.",
        OP_PUSHDATA4 => "4.",
        _ => "0.",
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Invalid(_) => f.write_str("(?)"),
            Operation::Underflow(data) => write!(f, "<{}>", hex::encode(data)),
            Operation::Op { code, data } if data.is_empty() => {
                f.write_str(&opcode_to_mnemonic(*code))
            }
            Operation::Op { code, data } => write!(
                f,
                "[{}{}]",
                width_prefix(*code, data.len()),
                hex::encode(data)
            ),
        }
    }
}

impl std::str::FromStr for Operation {
    type Err = ConsensusError;

    fn from_str(token: &str) -> Result<Self> {
        parse_mnemonic(token)
            .ok_or_else(|| ConsensusError::InvalidMnemonic(token.to_string().into()))
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Operation::from_mnemonic(&token))
    }
}
