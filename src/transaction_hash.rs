//! Taproot signature hashing (BIP341/BIP342)
//!
//! The signature message is written field by field into a `TapSighash`
//! tagged hash. Which fields appear depends on the sighash type:
//!
//! | field | present when |
//! |---|---|
//! | epoch, hash_type, version, lock_time | always |
//! | sha_prevouts, sha_amounts, sha_scriptpubkeys, sha_sequences | not ANYONECANPAY |
//! | sha_outputs | coverage ALL |
//! | spend_type | always |
//! | outpoint, amount, scriptPubKey, sequence of this input | ANYONECANPAY |
//! | input_index | not ANYONECANPAY |
//! | sha_annex | annex present |
//! | sha_single_output | coverage SINGLE |
//! | tapleaf_hash, key_version, codesep_pos | tapscript spends |
//!
//! The aggregate hashes are identical for every input of a transaction, so
//! [`SighashCache`] computes each at most once per transaction.

use crate::config::{get_primitives_config, SighashConfig};
use crate::constants::{SIGHASH_EPOCH, TAPSCRIPT_KEY_VERSION};
use crate::crypto::TaggedHashWriter;
use crate::error::{ConsensusError, Result};
use crate::script::Script;
use crate::serialization::{write_outpoint, write_output, write_prefixed_bytes, ByteSink};
use crate::taproot::{code_separator_position, spend_type};
use crate::types::*;
use crate::witness;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Which outputs a signature commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coverage {
    /// Sign all outputs
    All,
    /// Sign no outputs
    None,
    /// Sign output at same index as input
    Single,
}

/// Taproot sighash type byte
///
/// Valid values are 0x00 (default, covers all outputs), 0x01-0x03 and the
/// same three with ANYONECANPAY (0x81-0x83).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SighashType(u8);

impl SighashType {
    pub const DEFAULT: Self = Self(0x00);
    pub const ALL: Self = Self(0x01);
    pub const NONE: Self = Self(0x02);
    pub const SINGLE: Self = Self(0x03);
    pub const ALL_ANYONECANPAY: Self = Self(0x81);
    pub const NONE_ANYONECANPAY: Self = Self(0x82);
    pub const SINGLE_ANYONECANPAY: Self = Self(0x83);

    const ANYONECANPAY: u8 = 0x80;
    const COVERAGE_MASK: u8 = 0x03;

    /// Parse sighash type from byte
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x00..=0x03 | 0x81..=0x83 => Ok(Self(byte)),
            _ => Err(ConsensusError::InvalidSighashType(byte)),
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self.0
    }

    /// SIGHASH_DEFAULT behaves as SIGHASH_ALL.
    #[inline]
    pub fn coverage(self) -> Coverage {
        match self.0 & Self::COVERAGE_MASK {
            0x02 => Coverage::None,
            0x03 => Coverage::Single,
            _ => Coverage::All,
        }
    }

    #[inline]
    pub fn anyone_can_pay(self) -> bool {
        self.0 & Self::ANYONECANPAY != 0
    }
}

impl TryFrom<u8> for SighashType {
    type Error = ConsensusError;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte)
    }
}

impl From<SighashType> for u8 {
    fn from(sighash_type: SighashType) -> Self {
        sighash_type.0
    }
}

fn spent_output(tx: &Transaction, index: usize) -> Result<&TransactionOutput> {
    tx.inputs[index]
        .spent_output
        .as_ref()
        .ok_or(ConsensusError::MissingPrevout(index))
}

/// sha_prevouts: SHA256 of all input outpoints
pub fn hash_points(tx: &Transaction) -> Hash {
    let mut engine = Sha256::new();
    for input in &tx.inputs {
        write_outpoint(&mut engine, &input.prevout);
    }
    engine.finalize().into()
}

/// sha_amounts: SHA256 of all spent amounts
pub fn hash_amounts(tx: &Transaction) -> Result<Hash> {
    let mut engine = Sha256::new();
    for index in 0..tx.inputs.len() {
        engine.write_u64_le(spent_output(tx, index)?.value);
    }
    Ok(engine.finalize().into())
}

/// sha_scriptpubkeys: SHA256 of all spent scripts, each length-prefixed
pub fn hash_scripts(tx: &Transaction) -> Result<Hash> {
    let mut engine = Sha256::new();
    for index in 0..tx.inputs.len() {
        write_prefixed_bytes(&mut engine, &spent_output(tx, index)?.script_pubkey);
    }
    Ok(engine.finalize().into())
}

/// sha_sequences: SHA256 of all input sequence numbers
pub fn hash_sequences(tx: &Transaction) -> Hash {
    let mut engine = Sha256::new();
    for input in &tx.inputs {
        engine.write_u32_le(input.sequence);
    }
    engine.finalize().into()
}

/// sha_outputs: SHA256 of all serialized outputs
pub fn hash_outputs(tx: &Transaction) -> Hash {
    let mut engine = Sha256::new();
    for output in &tx.outputs {
        write_output(&mut engine, output);
    }
    engine.finalize().into()
}

/// sha_single_output: SHA256 of one serialized output
pub fn hash_single_output(output: &TransactionOutput) -> Hash {
    let mut engine = Sha256::new();
    write_output(&mut engine, output);
    engine.finalize().into()
}

/// Read-through cache of `cell`, bypassed when `enabled` is false.
fn cached(
    cell: &OnceLock<Hash>,
    enabled: bool,
    name: &'static str,
    compute: impl FnOnce() -> Result<Hash>,
) -> Result<Hash> {
    if !enabled {
        return compute();
    }
    if let Some(hash) = cell.get() {
        return Ok(*hash);
    }
    let hash = compute()?;
    trace!(field = name, "populated sighash cache");
    Ok(*cell.get_or_init(|| hash))
}

/// Per-transaction signature hash engine
///
/// Holds the aggregate hashes shared by every input of one transaction.
/// Each field is populated at most once (`OnceLock`), so a cache may be
/// shared across threads verifying different inputs concurrently. Callers
/// that prefer a read-only cache call [`Self::precompute`] before fanning
/// out.
#[derive(Debug)]
pub struct SighashCache<'a> {
    tx: &'a Transaction,
    config: SighashConfig,
    log_rejections: bool,
    points: OnceLock<Hash>,
    amounts: OnceLock<Hash>,
    scripts: OnceLock<Hash>,
    sequences: OnceLock<Hash>,
    outputs: OnceLock<Hash>,
    single_outputs: Box<[OnceLock<Hash>]>,
}

impl<'a> SighashCache<'a> {
    /// Cache configured from the global [`crate::config::PrimitivesConfig`].
    pub fn new(tx: &'a Transaction) -> Self {
        let config = get_primitives_config();
        let mut cache = Self::with_config(tx, config.sighash);
        cache.log_rejections = config.debug.log_rejections;
        cache
    }

    pub fn with_config(tx: &'a Transaction, config: SighashConfig) -> Self {
        Self {
            tx,
            config,
            log_rejections: true,
            points: OnceLock::new(),
            amounts: OnceLock::new(),
            scripts: OnceLock::new(),
            sequences: OnceLock::new(),
            outputs: OnceLock::new(),
            single_outputs: tx.outputs.iter().map(|_| OnceLock::new()).collect(),
        }
    }

    #[inline]
    pub fn transaction(&self) -> &'a Transaction {
        self.tx
    }

    /// Populate every cached field now.
    ///
    /// # Errors
    ///
    /// `MissingPrevout` if an input has no spent output attached; the
    /// amount and script aggregates cannot be formed without them.
    pub fn precompute(&self) -> Result<()> {
        self.points_hash()?;
        self.amounts_hash()?;
        self.scripts_hash()?;
        self.sequences_hash()?;
        self.outputs_hash()?;
        for index in 0..self.tx.outputs.len() {
            self.single_output_hash(index)?;
        }
        Ok(())
    }

    pub fn points_hash(&self) -> Result<Hash> {
        cached(&self.points, self.config.cache_aggregate_hashes, "sha_prevouts", || {
            Ok(hash_points(self.tx))
        })
    }

    pub fn amounts_hash(&self) -> Result<Hash> {
        cached(&self.amounts, self.config.cache_aggregate_hashes, "sha_amounts", || {
            hash_amounts(self.tx)
        })
    }

    pub fn scripts_hash(&self) -> Result<Hash> {
        cached(&self.scripts, self.config.cache_aggregate_hashes, "sha_scriptpubkeys", || {
            hash_scripts(self.tx)
        })
    }

    pub fn sequences_hash(&self) -> Result<Hash> {
        cached(&self.sequences, self.config.cache_aggregate_hashes, "sha_sequences", || {
            Ok(hash_sequences(self.tx))
        })
    }

    pub fn outputs_hash(&self) -> Result<Hash> {
        cached(&self.outputs, self.config.cache_aggregate_hashes, "sha_outputs", || {
            Ok(hash_outputs(self.tx))
        })
    }

    pub fn single_output_hash(&self, index: usize) -> Result<Hash> {
        let (cell, output) = self
            .single_outputs
            .get(index)
            .zip(self.tx.outputs.get(index))
            .ok_or(ConsensusError::SingleWithoutOutput {
                index,
                outputs: self.tx.outputs.len(),
            })?;
        cached(cell, self.config.cache_single_outputs, "sha_single_output", || {
            Ok(hash_single_output(output))
        })
    }

    fn reject(&self, error: ConsensusError) -> ConsensusError {
        if self.log_rejections {
            debug!(%error, "signature hash refused");
        }
        error
    }

    /// BIP341 signature hash for input `input_index`
    ///
    /// # Arguments
    /// * `script` - executing script, its cursor locating the last executed
    ///   OP_CODESEPARATOR (tapscript only)
    /// * `value` - amount of the output spent by this input
    /// * `tapleaf` - leaf hash for script path spends, `None` for key path
    /// * `sighash_type` - hash type byte from the signature
    ///
    /// # Errors
    ///
    /// Refuses ANYONECANPAY without a spent output for this input, and
    /// SIGHASH_SINGLE with no output at the input's index. No digest is
    /// produced in either case.
    pub fn taproot_signature_hash(
        &self,
        input_index: usize,
        script: &Script,
        value: u64,
        tapleaf: Option<&Hash>,
        sighash_type: SighashType,
    ) -> Result<Hash> {
        let tx = self.tx;
        let input = tx
            .inputs
            .get(input_index)
            .ok_or_else(|| self.reject(ConsensusError::InvalidInputIndex(input_index)))?;
        let position =
            u32::try_from(input_index).map_err(|_| ConsensusError::InvalidInputIndex(input_index))?;

        let anyone_can_pay = sighash_type.anyone_can_pay();
        let coverage = sighash_type.coverage();
        let annex = witness::annex(&input.witness);

        if anyone_can_pay && input.spent_output.is_none() {
            return Err(self.reject(ConsensusError::AnyoneCanPayWithoutPrevout(input_index)));
        }
        // Taproot has no SIGHASH_SINGLE fallback digest.
        if coverage == Coverage::Single && input_index >= tx.outputs.len() {
            return Err(self.reject(ConsensusError::SingleWithoutOutput {
                index: input_index,
                outputs: tx.outputs.len(),
            }));
        }

        let mut sink = TaggedHashWriter::tap_sighash();
        sink.write_byte(SIGHASH_EPOCH);
        sink.write_byte(sighash_type.to_byte());
        sink.write_u32_le(tx.version);
        sink.write_u32_le(tx.lock_time);

        if !anyone_can_pay {
            sink.write_bytes(&self.points_hash()?);
            sink.write_bytes(&self.amounts_hash().map_err(|e| self.reject(e))?);
            sink.write_bytes(&self.scripts_hash().map_err(|e| self.reject(e))?);
            sink.write_bytes(&self.sequences_hash()?);
        }

        if coverage == Coverage::All {
            sink.write_bytes(&self.outputs_hash()?);
        }

        sink.write_byte(spend_type(annex.is_some(), tapleaf.is_some()));

        match &input.spent_output {
            Some(prevout) if anyone_can_pay => {
                write_outpoint(&mut sink, &input.prevout);
                sink.write_u64_le(value);
                write_prefixed_bytes(&mut sink, &prevout.script_pubkey);
                sink.write_u32_le(input.sequence);
            }
            _ => sink.write_u32_le(position),
        }

        if let Some(annex) = annex {
            witness::write_annex_hash(&mut sink, annex);
        }

        if coverage == Coverage::Single {
            sink.write_bytes(&self.single_output_hash(input_index)?);
        }

        if let Some(leaf_hash) = tapleaf {
            sink.write_bytes(leaf_hash);
            sink.write_byte(TAPSCRIPT_KEY_VERSION);
            sink.write_u32_le(code_separator_position(script));
        }

        Ok(sink.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TAG_TAP_SIGHASH;
    use crate::crypto::tagged_hash;

    fn create_test_transaction() -> Transaction {
        let input = |n: u8| TransactionInput {
            prevout: OutPoint {
                hash: [n; 32],
                index: n as u32,
            },
            script_sig: vec![],
            sequence: 0xffff_fffd,
            witness: vec![vec![0x11; 64]],
            spent_output: Some(TransactionOutput {
                value: 10_000 * n as u64,
                script_pubkey: vec![0x51, 0x20, n, n],
            }),
        };
        Transaction {
            version: 2,
            inputs: vec![input(1), input(2)],
            outputs: vec![
                TransactionOutput {
                    value: 15_000,
                    script_pubkey: vec![0x00, 0x14, 0xaa],
                },
                TransactionOutput {
                    value: 14_000,
                    script_pubkey: vec![0x51],
                },
            ],
            lock_time: 0,
        }
    }

    #[test]
    fn test_sighash_type_from_byte() {
        for byte in [0x00, 0x01, 0x02, 0x03, 0x81, 0x82, 0x83] {
            assert_eq!(SighashType::from_byte(byte).unwrap().to_byte(), byte);
        }
        for byte in [0x04, 0x80, 0x84, 0xff] {
            assert_eq!(
                SighashType::from_byte(byte),
                Err(ConsensusError::InvalidSighashType(byte))
            );
        }
    }

    #[test]
    fn test_coverage() {
        assert_eq!(SighashType::DEFAULT.coverage(), Coverage::All);
        assert_eq!(SighashType::ALL.coverage(), Coverage::All);
        assert_eq!(SighashType::NONE_ANYONECANPAY.coverage(), Coverage::None);
        assert_eq!(SighashType::SINGLE.coverage(), Coverage::Single);
        assert!(SighashType::SINGLE_ANYONECANPAY.anyone_can_pay());
        assert!(!SighashType::ALL.anyone_can_pay());
    }

    #[test]
    fn test_sighash_type_serde_validates() {
        assert_eq!(serde_json::to_string(&SighashType::ALL).unwrap(), "1");
        assert!(serde_json::from_str::<SighashType>("131").is_ok());
        assert!(serde_json::from_str::<SighashType>("4").is_err());
    }

    #[test]
    fn test_key_path_default_preimage() {
        let tx = create_test_transaction();
        let cache = SighashCache::with_config(&tx, SighashConfig::default());
        let digest = cache
            .taproot_signature_hash(1, &Script::default(), 20_000, None, SighashType::DEFAULT)
            .unwrap();

        let mut msg = vec![0x00, 0x00];
        msg.extend_from_slice(&2u32.to_le_bytes());
        msg.extend_from_slice(&0u32.to_le_bytes());
        msg.extend_from_slice(&hash_points(&tx));
        msg.extend_from_slice(&hash_amounts(&tx).unwrap());
        msg.extend_from_slice(&hash_scripts(&tx).unwrap());
        msg.extend_from_slice(&hash_sequences(&tx));
        msg.extend_from_slice(&hash_outputs(&tx));
        msg.push(0x00);
        msg.extend_from_slice(&1u32.to_le_bytes());
        assert_eq!(digest, tagged_hash(TAG_TAP_SIGHASH, &msg));
    }

    #[test]
    fn test_missing_prevout_rejected_without_anyone_can_pay() {
        let mut tx = create_test_transaction();
        tx.inputs[0].spent_output = None;
        let cache = SighashCache::with_config(&tx, SighashConfig::default());
        assert_eq!(
            cache.taproot_signature_hash(1, &Script::default(), 0, None, SighashType::ALL),
            Err(ConsensusError::MissingPrevout(0))
        );
        // Only this input's prevout matters under ANYONECANPAY.
        assert!(cache
            .taproot_signature_hash(
                1,
                &Script::default(),
                20_000,
                None,
                SighashType::ALL_ANYONECANPAY
            )
            .is_ok());
    }

    #[test]
    fn test_invalid_input_index() {
        let tx = create_test_transaction();
        let cache = SighashCache::with_config(&tx, SighashConfig::default());
        assert_eq!(
            cache.taproot_signature_hash(2, &Script::default(), 0, None, SighashType::ALL),
            Err(ConsensusError::InvalidInputIndex(2))
        );
    }

    #[test]
    fn test_precompute_fills_every_field() {
        let tx = create_test_transaction();
        let cache = SighashCache::with_config(&tx, SighashConfig::default());
        cache.precompute().unwrap();
        assert_eq!(cache.points.get(), Some(&hash_points(&tx)));
        assert_eq!(cache.scripts.get(), Some(&hash_scripts(&tx).unwrap()));
        assert_eq!(
            cache.single_outputs[1].get(),
            Some(&hash_single_output(&tx.outputs[1]))
        );
    }

    #[test]
    fn test_disabled_cache_stays_empty() {
        let tx = create_test_transaction();
        let config = SighashConfig {
            cache_aggregate_hashes: false,
            cache_single_outputs: false,
        };
        let cache = SighashCache::with_config(&tx, config);
        let uncached = cache
            .taproot_signature_hash(0, &Script::default(), 10_000, None, SighashType::SINGLE)
            .unwrap();
        assert!(cache.points.get().is_none());
        assert!(cache.single_outputs[0].get().is_none());

        let memoized = SighashCache::with_config(&tx, SighashConfig::default())
            .taproot_signature_hash(0, &Script::default(), 10_000, None, SighashType::SINGLE)
            .unwrap();
        assert_eq!(uncached, memoized);
    }
}
