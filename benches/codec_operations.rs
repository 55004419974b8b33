//! Script codec benchmarks
//!
//! Run with: cargo bench --bench codec_operations

use blvm_primitives::operation::Operation;
use blvm_primitives::script::Script;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Tapscript with `keys` x-only keys in a CHECKSIGADD multisig
fn create_multisig_script(keys: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    for i in 0..keys {
        bytes.push(0x20);
        bytes.extend_from_slice(&[i as u8; 32]);
        bytes.push(if i == 0 { 0xac } else { 0xba });
    }
    bytes.extend_from_slice(&[0x52, 0x9c]);
    bytes
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("script_from_data");
    for keys in [1usize, 16, 100] {
        let bytes = create_multisig_script(keys);
        group.bench_with_input(BenchmarkId::from_parameter(keys), &bytes, |b, bytes| {
            b.iter(|| black_box(Script::from_data(black_box(bytes))))
        });
    }
    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let script = Script::from_data(&create_multisig_script(16));

    c.bench_function("script_to_data_16_keys", |b| {
        b.iter(|| black_box(script.to_data(black_box(true))))
    });
}

fn benchmark_underflow(c: &mut Criterion) {
    // PUSHDATA4 claiming far more than is present
    let mut bytes = vec![0x4e, 0xff, 0xff, 0xff, 0x7f];
    bytes.extend_from_slice(&[0u8; 512]);

    c.bench_function("operation_underflow_512b", |b| {
        b.iter(|| black_box(Operation::from_data(black_box(&bytes))))
    });
}

fn benchmark_mnemonic(c: &mut Criterion) {
    let script = Script::from_data(&create_multisig_script(16));
    let text = script.to_string();

    c.bench_function("script_to_mnemonic_16_keys", |b| {
        b.iter(|| black_box(script.to_string()))
    });

    c.bench_function("script_from_mnemonic_16_keys", |b| {
        b.iter(|| black_box(Script::from_mnemonic(black_box(&text))))
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_serialize,
    benchmark_underflow,
    benchmark_mnemonic
);
criterion_main!(benches);
