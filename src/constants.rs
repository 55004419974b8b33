//! Consensus constants for the script codec and taproot signature hashing

/// Maximum block size in bytes (legacy, pre-weight ceiling).
///
/// A push-data length claiming more than this invalidates the reader before
/// any allocation is attempted.
pub const MAX_BLOCK_SIZE: usize = 1_000_000;

/// Opcode reported by operations that carry no executable opcode
/// (underflow tokens and the invalid operation). OP_VERIF fails
/// unconditionally when executed, so nothing valid is lost.
pub const INVALID_OPCODE: u8 = crate::opcodes::OP_VERIF;

/// Placeholder data held by the default invalid operation.
pub const INVALID_OPERATION_DATA: [u8; 1] = [0x42];

/// Code-separator position committed when none has executed (BIP342)
pub const CODESEPARATOR_NONE: u32 = 0xffff_ffff;

/// Sighash epoch byte (BIP341)
pub const SIGHASH_EPOCH: u8 = 0x00;

/// Key version committed by tapscript signatures (BIP342)
pub const TAPSCRIPT_KEY_VERSION: u8 = 0x00;

/// Leaf version of BIP342 tapscript
pub const TAPSCRIPT_LEAF_VERSION: u8 = 0xc0;

/// Extension flag for key path spends
pub const EXT_FLAG_TAPROOT: u8 = 0;

/// Extension flag for tapscript spends
pub const EXT_FLAG_TAPSCRIPT: u8 = 1;

/// First byte of a witness annex (BIP341)
pub const ANNEX_TAG: u8 = 0x50;

/// Domain tag of the taproot signature hash
pub const TAG_TAP_SIGHASH: &str = "TapSighash";

/// Domain tag of a tapscript leaf hash
pub const TAG_TAP_LEAF: &str = "TapLeaf";
