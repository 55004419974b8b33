//! # blvm-primitives
//!
//! Bitcoin script operation codec and taproot signature hashing.
//!
//! Both halves are consensus code: the codec must reproduce every script
//! byte exactly, malformed or not, and the signature hash must commit to
//! exactly the BIP341 message. Neither performs I/O or spawns work.
//!
//! ## Layout
//!
//! - [`opcodes`]: opcode constants, classification and mnemonic names
//! - [`operation`]: one script token and its byte/mnemonic codec
//! - [`script`]: ordered operations with an execution cursor
//! - [`transaction_hash`]: sighash types, aggregate hashes, [`SighashCache`]
//! - [`taproot`]: tapleaf hashes, spend type, code separator position
//!
//! ## Usage
//!
//! ```rust
//! use blvm_primitives::operation::Operation;
//! use blvm_primitives::script::Script;
//!
//! // A push claiming five bytes with only two available is retained as is.
//! let script = Script::from_data(&[0x4c, 0x05, 0x01, 0x02]);
//! assert!(script.is_underflow());
//! assert_eq!(script.to_data(false).unwrap(), vec![0x4c, 0x05, 0x01, 0x02]);
//!
//! let op = Operation::from_mnemonic("[1.0102]");
//! assert_eq!(op.to_data().unwrap(), vec![0x4c, 0x02, 0x01, 0x02]);
//! ```

pub mod config;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod opcodes;
pub mod operation;
pub mod script;
pub mod script_num;
pub mod serialization;
pub mod taproot;
pub mod transaction_hash;
pub mod types;
pub mod witness;

pub use error::{ConsensusError, Result};
pub use operation::Operation;
pub use script::Script;
pub use taproot::compute_taproot_signature_hash;
pub use transaction_hash::{Coverage, SighashCache, SighashType};
