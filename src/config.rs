//! Configuration for blvm-primitives
//!
//! Runtime switches for signature-hash caching and diagnostics. Consensus
//! values (size ceilings, sentinels, tags) live in [`crate::constants`];
//! no setting here changes a computed digest or a serialized byte.

use crate::error::{ConsensusError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Signature hash engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SighashConfig {
    /// Memoize the aggregate input and output hashes per transaction
    /// (sha_prevouts, sha_amounts, sha_scriptpubkeys, sha_sequences,
    /// sha_outputs). When disabled they are recomputed for every input.
    /// Default: true
    #[serde(default = "default_true")]
    pub cache_aggregate_hashes: bool,

    /// Memoize per-output hashes used by SIGHASH_SINGLE.
    /// Default: true
    #[serde(default = "default_true")]
    pub cache_single_outputs: bool,
}

impl Default for SighashConfig {
    fn default() -> Self {
        Self {
            cache_aggregate_hashes: true,
            cache_single_outputs: true,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Emit a `debug` event when a signature hash is refused
    /// Default: true
    #[serde(default = "default_true")]
    pub log_rejections: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_rejections: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrimitivesConfig {
    #[serde(default)]
    pub sighash: SighashConfig,

    #[serde(default)]
    pub debug: DebugConfig,
}

impl PrimitivesConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: `BLVM_PRIMITIVES_<SECTION>_<KEY>`
    ///
    /// Examples:
    /// - `BLVM_PRIMITIVES_SIGHASH_CACHE_AGGREGATE_HASHES=false`
    /// - `BLVM_PRIMITIVES_DEBUG_LOG_REJECTIONS=false`
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(enabled) = env_bool("BLVM_PRIMITIVES_SIGHASH_CACHE_AGGREGATE_HASHES") {
            config.sighash.cache_aggregate_hashes = enabled;
        }
        if let Some(enabled) = env_bool("BLVM_PRIMITIVES_SIGHASH_CACHE_SINGLE_OUTPUTS") {
            config.sighash.cache_single_outputs = enabled;
        }
        if let Some(enabled) = env_bool("BLVM_PRIMITIVES_DEBUG_LOG_REJECTIONS") {
            config.debug.log_rejections = enabled;
        }

        config
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConsensusError::Config(Cow::Owned(e.to_string())))
    }
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok()?.trim().parse().ok()
}

/// Global configuration instance
static GLOBAL_PRIMITIVES_CONFIG: std::sync::OnceLock<PrimitivesConfig> =
    std::sync::OnceLock::new();

/// Initialize global configuration
///
/// Call once at startup, before any signature hashing. If never called,
/// [`get_primitives_config`] falls back to [`PrimitivesConfig::from_env`].
pub fn init_primitives_config(config: PrimitivesConfig) -> Result<()> {
    GLOBAL_PRIMITIVES_CONFIG
        .set(config)
        .map_err(|_| ConsensusError::Config(Cow::Borrowed("configuration already initialized")))
}

/// Get global configuration
pub fn get_primitives_config() -> PrimitivesConfig {
    GLOBAL_PRIMITIVES_CONFIG
        .get()
        .cloned()
        .unwrap_or_else(PrimitivesConfig::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_caching() {
        let config = PrimitivesConfig::default();
        assert!(config.sighash.cache_aggregate_hashes);
        assert!(config.sighash.cache_single_outputs);
        assert!(config.debug.log_rejections);
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            PrimitivesConfig::from_json(r#"{"sighash": {"cache_single_outputs": false}}"#)
                .unwrap();
        assert!(config.sighash.cache_aggregate_hashes);
        assert!(!config.sighash.cache_single_outputs);
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            PrimitivesConfig::from_json("{not json"),
            Err(ConsensusError::Config(_))
        ));
    }
}
