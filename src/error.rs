//! Error types for script codec and signature hashing

use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ConsensusError {
    #[error("Serialization error: {0}")]
    Serialization(Cow<'static, str>),

    /// The invalid operation has no wire form.
    #[error("Invalid operation cannot be serialized")]
    InvalidOperation,

    #[error("Push data of {size} bytes does not fit opcode 0x{code:02x}")]
    PushSizeOverflow { code: u8, size: usize },

    #[error("Invalid script mnemonic: {0}")]
    InvalidMnemonic(Cow<'static, str>),

    #[error("Invalid sighash type: {0}")]
    InvalidSighashType(u8),

    #[error("Invalid input index: {0}")]
    InvalidInputIndex(usize),

    #[error("Input {0} has no spent output attached")]
    MissingPrevout(usize),

    #[error("Anyone-can-pay signature for input {0} without a previous output")]
    AnyoneCanPayWithoutPrevout(usize),

    #[error("SIGHASH_SINGLE for input {index} but transaction has {outputs} outputs")]
    SingleWithoutOutput { index: usize, outputs: usize },

    #[error("Configuration error: {0}")]
    Config(Cow<'static, str>),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
