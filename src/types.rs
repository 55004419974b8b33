//! Transaction model committed to by signature hashes

use crate::witness::Witness;
use serde::{Deserialize, Serialize};

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Reference to a previous transaction output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

/// Transaction Output
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Amount in satoshis
    pub value: u64,
    pub script_pubkey: ByteString,
}

/// Transaction Input
///
/// `spent_output` is the output this input spends, attached by the caller
/// from its UTXO view. Taproot signatures commit to the amount and script of
/// every spent output, so it must be present to hash most signatures.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    pub sequence: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub witness: Witness,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// Amount of the spent output, if attached.
    #[inline]
    pub fn spent_value(&self) -> Option<u64> {
        self.spent_output.as_ref().map(|output| output.value)
    }
}

/// Transaction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}
