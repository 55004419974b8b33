//! Witness stacks and the taproot annex (BIP341)

use crate::constants::ANNEX_TAG;
use crate::crypto::sha256;
use crate::serialization::{write_prefixed_bytes, ByteSink};
use crate::types::{ByteString, Hash};

/// Witness Data: stack of byte strings
pub type Witness = Vec<ByteString>;

/// The annex, if present: at least two elements and the last one starts
/// with 0x50.
pub fn annex(witness: &[ByteString]) -> Option<&[u8]> {
    match witness {
        [_, .., last] if last.first() == Some(&ANNEX_TAG) => Some(last.as_slice()),
        _ => None,
    }
}

/// Witness elements with any annex removed.
pub fn strip_annex(witness: &[ByteString]) -> &[ByteString] {
    match annex(witness) {
        Some(_) => &witness[..witness.len() - 1],
        None => witness,
    }
}

/// Tapscript and control block of a script path spend: the last two
/// elements once the annex is stripped. `None` for key path spends.
pub fn script_path_parts(witness: &[ByteString]) -> Option<(&[u8], &[u8])> {
    match strip_annex(witness) {
        [.., script, control] => Some((script.as_slice(), control.as_slice())),
        _ => None,
    }
}

/// sha_annex: SHA256 of the compact-size prefixed annex.
pub fn hash_annex(annex: &[u8]) -> Hash {
    let mut preimage = Vec::with_capacity(annex.len() + 9);
    write_prefixed_bytes(&mut preimage, annex);
    sha256(&preimage)
}

/// Stream the annex commitment into `sink`.
pub(crate) fn write_annex_hash<S: ByteSink + ?Sized>(sink: &mut S, annex: &[u8]) {
    sink.write_bytes(&hash_annex(annex));
}
