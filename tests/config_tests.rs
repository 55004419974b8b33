//! Configuration loading tests

use blvm_primitives::config::{
    get_primitives_config, init_primitives_config, PrimitivesConfig, SighashConfig,
};
use blvm_primitives::script::Script;
use blvm_primitives::{ConsensusError, SighashCache, SighashType};
use blvm_primitives::types::*;

#[test]
fn test_json_round_trip() {
    let config = PrimitivesConfig {
        sighash: SighashConfig {
            cache_aggregate_hashes: false,
            cache_single_outputs: true,
        },
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(PrimitivesConfig::from_json(&json).unwrap(), config);
    assert_eq!(PrimitivesConfig::from_json("{}").unwrap(), PrimitivesConfig::default());
}

#[test]
fn test_from_env_overrides() {
    std::env::set_var("BLVM_PRIMITIVES_DEBUG_LOG_REJECTIONS", "false");
    std::env::set_var("BLVM_PRIMITIVES_SIGHASH_CACHE_SINGLE_OUTPUTS", "not-a-bool");
    let config = PrimitivesConfig::from_env();
    std::env::remove_var("BLVM_PRIMITIVES_DEBUG_LOG_REJECTIONS");
    std::env::remove_var("BLVM_PRIMITIVES_SIGHASH_CACHE_SINGLE_OUTPUTS");

    assert!(!config.debug.log_rejections);
    // Unparseable values keep the default.
    assert!(config.sighash.cache_single_outputs);
    assert!(config.sighash.cache_aggregate_hashes);
}

/// Global initialization succeeds once and is visible to new caches.
#[test]
fn test_global_init_once() {
    let mut config = PrimitivesConfig::default();
    config.sighash.cache_aggregate_hashes = false;
    config.debug.log_rejections = false;

    init_primitives_config(config.clone()).unwrap();
    assert_eq!(get_primitives_config(), config);
    assert!(matches!(
        init_primitives_config(PrimitivesConfig::default()),
        Err(ConsensusError::Config(_))
    ));

    // Settings change caching only, never the digest.
    let tx = Transaction {
        version: 2,
        inputs: vec![TransactionInput {
            spent_output: Some(TransactionOutput {
                value: 1_000,
                script_pubkey: vec![0x51],
            }),
            ..Default::default()
        }],
        outputs: vec![TransactionOutput::default()],
        lock_time: 0,
    };
    let script = Script::default();
    let global = SighashCache::new(&tx)
        .taproot_signature_hash(0, &script, 1_000, None, SighashType::ALL)
        .unwrap();
    let cached = SighashCache::with_config(&tx, SighashConfig::default())
        .taproot_signature_hash(0, &script, 1_000, None, SighashType::ALL)
        .unwrap();
    assert_eq!(global, cached);
}
