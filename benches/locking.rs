// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for lock manager operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use detcc::storage::Key;
use detcc::txn::{LockManager, LockPolicy, ReadyQueue, TxnId};
use std::sync::Arc;

fn create_manager(policy: LockPolicy) -> (LockManager<TxnId>, Arc<ReadyQueue<TxnId>>) {
    let ready = Arc::new(ReadyQueue::new());
    (LockManager::new(policy, Arc::clone(&ready)), ready)
}

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("locks");
    group.throughput(Throughput::Elements(1));

    for policy in [LockPolicy::ExclusiveOnly, LockPolicy::SharedExclusive] {
        let (mgr, _ready) = create_manager(policy);
        let keys: Vec<Key> = (0..1024u64).map(Key::from).collect();
        let counter = std::sync::atomic::AtomicU64::new(0);

        group.bench_function(format!("acquire_release/{policy:?}"), |b| {
            b.iter(|| {
                let i = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                let key = &keys[(i % 1024) as usize];
                let outcome = mgr.write_lock(TxnId(i), key);
                mgr.release(&TxnId(i), key);
                black_box(outcome)
            })
        });
    }

    group.finish();
}

fn bench_hot_key_handoff(c: &mut Criterion) {
    let (mgr, ready) = create_manager(LockPolicy::SharedExclusive);
    let key = Key::from("hot");

    let mut group = c.benchmark_group("locks");
    group.throughput(Throughput::Elements(64));

    group.bench_function("fifo_handoff_64", |b| {
        b.iter(|| {
            for id in 0..64 {
                let _ = mgr.write_lock(TxnId(id), &key);
            }
            for id in 0..64 {
                mgr.release(&TxnId(id), &key);
            }
            black_box(ready.drain())
        })
    });

    group.finish();
}

fn bench_shared_readers(c: &mut Criterion) {
    let (mgr, ready) = create_manager(LockPolicy::SharedExclusive);
    let key = Key::from("read-mostly");

    c.bench_function("locks::reader_run_after_writer", |b| {
        b.iter(|| {
            let _ = mgr.write_lock(TxnId(0), &key);
            for id in 1..=32 {
                let _ = mgr.read_lock(TxnId(id), &key);
            }
            mgr.release(&TxnId(0), &key);
            for id in 1..=32 {
                mgr.release(&TxnId(id), &key);
            }
            black_box(ready.drain())
        })
    });
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_hot_key_handoff,
    bench_shared_readers,
);
criterion_main!(benches);
