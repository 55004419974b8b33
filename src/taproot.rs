//! Taproot helpers for signature hashing (BIP341/BIP342)

use crate::constants::{CODESEPARATOR_NONE, EXT_FLAG_TAPROOT, EXT_FLAG_TAPSCRIPT};
use crate::crypto::TaggedHashWriter;
use crate::error::Result;
use crate::opcodes::OP_CODESEPARATOR;
use crate::script::Script;
use crate::serialization::{write_prefixed_bytes, ByteSink};
use crate::transaction_hash::{SighashCache, SighashType};
use crate::types::*;
use crate::witness;

/// Leaf version bits of a control block's first byte
const LEAF_VERSION_MASK: u8 = 0xfe;

/// TapLeaf hash: tagged hash of leaf version and length-prefixed script
pub fn compute_tapleaf_hash(script: &[u8], leaf_version: u8) -> Hash {
    let mut writer = TaggedHashWriter::tap_leaf();
    writer.write_byte(leaf_version);
    write_prefixed_bytes(&mut writer, script);
    writer.finalize()
}

/// Leaf hash of the script executed by a script path spend, taking the leaf
/// version from the control block. `None` for key path spends.
pub fn script_path_tapleaf_hash(witness: &[ByteString]) -> Option<Hash> {
    let (script, control) = witness::script_path_parts(witness)?;
    let leaf_version = control.first()? & LEAF_VERSION_MASK;
    Some(compute_tapleaf_hash(script, leaf_version))
}

/// spend_type byte: extension flag shifted left one bit, low bit set when
/// an annex is present.
#[inline]
pub fn spend_type(annex: bool, tapscript: bool) -> u8 {
    let ext_flag = if tapscript {
        EXT_FLAG_TAPSCRIPT
    } else {
        EXT_FLAG_TAPROOT
    };
    (ext_flag << 1) | u8::from(annex)
}

/// Opcode position of the last executed OP_CODESEPARATOR (BIP342).
///
/// The script cursor is that position. A cursor at zero only counts when
/// the first operation is itself a separator; otherwise no separator has
/// executed and the sentinel 0xffffffff is returned.
pub fn code_separator_position(script: &Script) -> u32 {
    let Some(first) = script.ops().first() else {
        return CODESEPARATOR_NONE;
    };
    let offset = script.offset();
    if offset == 0 && first.code() != OP_CODESEPARATOR {
        return CODESEPARATOR_NONE;
    }
    u32::try_from(offset).unwrap_or(CODESEPARATOR_NONE)
}

/// Compute a single BIP341 signature hash
///
/// Builds a one-shot [`SighashCache`]. Callers hashing several inputs of
/// the same transaction should keep one cache instead.
pub fn compute_taproot_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script: &Script,
    value: u64,
    tapleaf: Option<&Hash>,
    sighash_type: SighashType,
) -> Result<Hash> {
    SighashCache::new(tx).taproot_signature_hash(input_index, script, value, tapleaf, sighash_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{TAG_TAP_LEAF, TAPSCRIPT_LEAF_VERSION};
    use crate::crypto::tagged_hash;
    use crate::opcodes::*;

    #[test]
    fn test_spend_type() {
        assert_eq!(spend_type(false, false), 0x00);
        assert_eq!(spend_type(true, false), 0x01);
        assert_eq!(spend_type(false, true), 0x02);
        assert_eq!(spend_type(true, true), 0x03);
    }

    #[test]
    fn test_tapleaf_hash_layout() {
        let script = [OP_1];
        assert_eq!(
            compute_tapleaf_hash(&script, TAPSCRIPT_LEAF_VERSION),
            tagged_hash(TAG_TAP_LEAF, &[0xc0, 0x01, OP_1])
        );
    }

    #[test]
    fn test_script_path_tapleaf_hash_masks_parity() {
        let script = vec![OP_TRUE];
        let mut control = vec![0xc1];
        control.extend_from_slice(&[0x22; 32]);
        let witness = vec![script.clone(), control];
        assert_eq!(
            script_path_tapleaf_hash(&witness),
            Some(compute_tapleaf_hash(&script, TAPSCRIPT_LEAF_VERSION))
        );
        assert_eq!(script_path_tapleaf_hash(&[vec![0u8; 64]]), None);
    }

    #[test]
    fn test_code_separator_position_empty_script() {
        assert_eq!(code_separator_position(&Script::default()), CODESEPARATOR_NONE);
    }

    #[test]
    fn test_code_separator_position_at_start() {
        let mut script = Script::from_data(&[OP_CODESEPARATOR, OP_CHECKSIG]);
        assert_eq!(code_separator_position(&script), 0);
        script.set_offset(1);
        assert_eq!(code_separator_position(&script), 1);
    }

    #[test]
    fn test_code_separator_position_none_executed() {
        let mut script = Script::from_data(&[OP_DUP, OP_CODESEPARATOR, OP_CHECKSIG]);
        assert_eq!(code_separator_position(&script), CODESEPARATOR_NONE);
        script.set_offset(2);
        assert_eq!(code_separator_position(&script), 2);
    }
}
