//! # Block Ledger Benchmarks
//!
//! | Operation | Store |
//! |-----------|-------|
//! | append (`create_block`) | arena, KV |
//! | lookup by hash | arena |
//! | filtered search | arena |
//! | chain verification | arena |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use block_ledger::adapters::{
    BincodeBlockSerializer, InMemoryKVStore, KvBlockStore, SecureRandomSizer, SystemTimeSource,
};
use block_ledger::{BlockFilter, LedgerApi, LedgerDependencies, LedgerService, SortKey};

fn populated(len: usize) -> (impl LedgerApi, Vec<String>) {
    let ledger = LedgerService::in_memory();
    let hashes = (0..len)
        .map(|_| ledger.create_block().map(|b| b.block_hash))
        .collect::<Result<Vec<_>, _>>()
        .expect("populate ledger");
    (ledger, hashes)
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("arena", |b| {
        let ledger = LedgerService::in_memory();
        b.iter(|| black_box(ledger.create_block().is_ok()))
    });

    group.bench_function("kv_in_memory", |b| {
        let store = KvBlockStore::open(InMemoryKVStore::new(), BincodeBlockSerializer)
            .expect("open kv block store");
        let ledger = LedgerService::new(LedgerDependencies {
            store,
            time_source: SystemTimeSource,
            sizer: SecureRandomSizer,
        });
        b.iter(|| black_box(ledger.create_block().is_ok()))
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    for len in [100usize, 1_000] {
        let (ledger, hashes) = populated(len);
        let target = hashes[len / 2].clone();

        group.bench_with_input(BenchmarkId::new("by_hash", len), &target, |b, hash| {
            b.iter(|| black_box(ledger.get_block_by_hash(hash).is_ok()))
        });

        let filter = BlockFilter::new()
            .with_size_range(Some(3), Some(5))
            .sorted_by(SortKey::SizeDesc);
        group.bench_with_input(BenchmarkId::new("search", len), &filter, |b, filter| {
            b.iter(|| black_box(ledger.search_blocks(filter).map(|v| v.len())))
        });

        group.bench_function(BenchmarkId::new("verify", len), |b| {
            b.iter(|| black_box(ledger.verify_chain().map(|r| r.is_valid())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append, bench_queries);
criterion_main!(benches);
