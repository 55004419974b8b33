#![no_main]
use blvm_primitives::config::SighashConfig;
use blvm_primitives::script::Script;
use blvm_primitives::types::{OutPoint, Transaction, TransactionInput, TransactionOutput};
use blvm_primitives::{SighashCache, SighashType};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz signature hashing: flag byte, input selection, annex and prevout presence

    if data.len() < 4 {
        return;
    }

    let Ok(sighash_type) = SighashType::from_byte(data[0]) else {
        return;
    };
    let input_count = usize::from(data[1] % 4) + 1;
    let output_count = usize::from(data[2] % 4);
    let input_index = usize::from(data[3]) % input_count;
    let rest = &data[4..];

    let inputs = (0..input_count)
        .map(|i| {
            let seed = rest.get(i).copied().unwrap_or(0);
            let mut witness = vec![vec![seed; 64]];
            if seed & 1 == 1 {
                witness.push(vec![0x50, seed]);
            }
            TransactionInput {
                prevout: OutPoint {
                    hash: [seed; 32],
                    index: u32::from(seed),
                },
                script_sig: vec![],
                sequence: u32::from(seed) << 8,
                witness,
                spent_output: (seed & 2 == 0).then(|| TransactionOutput {
                    value: u64::from(seed) * 1_000,
                    script_pubkey: rest.to_vec(),
                }),
            }
        })
        .collect();
    let tx = Transaction {
        version: 2,
        inputs,
        outputs: (0..output_count)
            .map(|i| TransactionOutput {
                value: i as u64,
                script_pubkey: vec![0x51],
            })
            .collect(),
        lock_time: 0,
    };

    let script = Script::from_data(rest);
    let tapleaf = [0x5a; 32];
    let tapleaf = rest.first().filter(|b| *b & 4 == 4).map(|_| &tapleaf);

    // Cached and uncached engines must agree, including on refusals.
    let cached = SighashCache::with_config(&tx, SighashConfig::default())
        .taproot_signature_hash(input_index, &script, 1, tapleaf, sighash_type);
    let uncached = SighashCache::with_config(
        &tx,
        SighashConfig {
            cache_aggregate_hashes: false,
            cache_single_outputs: false,
        },
    )
    .taproot_signature_hash(input_index, &script, 1, tapleaf, sighash_type);
    assert_eq!(cached, uncached);
});
