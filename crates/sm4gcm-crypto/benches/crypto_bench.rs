//! SM4 and SM4-GCM benchmarks.
//!
//! Run with: cargo bench -p sm4gcm-crypto

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sm4gcm_crypto::{GhashBackend, RoundFunction, Sm4Gcm, Sm4GcmConfig, Sm4Key};

fn bench_sm4_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm4_block");
    group.throughput(Throughput::Bytes(16));

    for round_fn in [
        RoundFunction::Direct,
        RoundFunction::Table,
        RoundFunction::CompactTable,
    ] {
        let cipher = Sm4Key::with_round_function(&[0x42u8; 16], round_fn).unwrap();
        let block = [0x5au8; 16];
        group.bench_with_input(
            BenchmarkId::new("encrypt", format!("{round_fn:?}")),
            &block,
            |bench, block| {
                bench.iter(|| cipher.encrypt(block));
            },
        );
    }

    group.finish();
}

fn bench_sm4_gcm(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm4_gcm_seal");
    let nonce = [0x01u8; 12];
    let aad = [0x02u8; 20];

    for backend in [GhashBackend::ConstantTime, GhashBackend::Table4Bit] {
        let config = Sm4GcmConfig::builder().ghash_backend(backend).build();
        let gcm = Sm4Gcm::with_config(&[0x42u8; 16], config).unwrap();

        for size in [64usize, 1024, 16 * 1024] {
            let data = vec![0xa5u8; size];
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{backend:?}"), size),
                &data,
                |bench, data| {
                    bench.iter(|| gcm.seal(&nonce, data, &aad).unwrap());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_sm4_block, bench_sm4_gcm);
criterion_main!(benches);
