//! Hash primitives used by signature hashing
//!
//! Plain SHA-256 and BIP340 tagged hashes,
//! `SHA256(SHA256(tag) || SHA256(tag) || msg)`. The two tags this crate
//! uses have their seeded engine state computed once and cloned per hash.

use crate::constants::{TAG_TAP_LEAF, TAG_TAP_SIGHASH};
use crate::serialization::ByteSink;
use crate::types::Hash;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

static TAP_SIGHASH_ENGINE: OnceLock<Sha256> = OnceLock::new();
static TAP_LEAF_ENGINE: OnceLock<Sha256> = OnceLock::new();

/// Single SHA-256
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

fn seeded_engine(tag: &str) -> Sha256 {
    let tag_hash = Sha256::digest(tag.as_bytes());
    let mut engine = Sha256::new();
    engine.update(tag_hash);
    engine.update(tag_hash);
    engine
}

/// Streaming hash sink pre-seeded with a domain-separation tag.
#[derive(Clone)]
pub struct TaggedHashWriter {
    engine: Sha256,
}

impl TaggedHashWriter {
    pub fn new(tag: &str) -> Self {
        let engine = match tag {
            TAG_TAP_SIGHASH => TAP_SIGHASH_ENGINE
                .get_or_init(|| seeded_engine(TAG_TAP_SIGHASH))
                .clone(),
            TAG_TAP_LEAF => TAP_LEAF_ENGINE
                .get_or_init(|| seeded_engine(TAG_TAP_LEAF))
                .clone(),
            other => seeded_engine(other),
        };
        Self { engine }
    }

    /// Writer for the BIP341 signature message.
    #[inline]
    pub fn tap_sighash() -> Self {
        Self::new(TAG_TAP_SIGHASH)
    }

    #[inline]
    pub fn tap_leaf() -> Self {
        Self::new(TAG_TAP_LEAF)
    }

    pub fn finalize(self) -> Hash {
        self.engine.finalize().into()
    }
}

impl ByteSink for TaggedHashWriter {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.engine.update(bytes);
    }
}

/// One-shot tagged hash.
pub fn tagged_hash(tag: &str, msg: &[u8]) -> Hash {
    let mut writer = TaggedHashWriter::new(tag);
    writer.write_bytes(msg);
    writer.finalize()
}
