use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use ledgercast_core::AccountNumber;
use ledgercast_infra::{InMemoryStorage, JsonFileStorage, LedgerStore};
use rust_decimal::Decimal;

/// Deposit + withdraw pairs keep balances stable across iterations.
fn bench_round_trips(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_store_round_trip");
    let account = AccountNumber::from("0001");
    let amount = Decimal::from(5);

    for ops in [1usize, 100] {
        group.throughput(Throughput::Elements(ops as u64 * 2));

        group.bench_with_input(BenchmarkId::new("in_memory", ops), &ops, |b, &ops| {
            let store = LedgerStore::open(InMemoryStorage::new());
            b.iter(|| {
                for _ in 0..ops {
                    black_box(store.deposit(&account, amount)).ok();
                    black_box(store.withdraw(&account, amount)).ok();
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("json_file", ops), &ops, |b, &ops| {
            let dir = std::env::temp_dir().join(format!("ledgercast-bench-{}", std::process::id()));
            let store = LedgerStore::open(JsonFileStorage::new(dir.join("accounts.json")));
            b.iter(|| {
                for _ in 0..ops {
                    black_box(store.deposit(&account, amount)).ok();
                    black_box(store.withdraw(&account, amount)).ok();
                }
            });
            let _ = std::fs::remove_dir_all(&dir);
        });
    }

    group.finish();
}

fn bench_transfers(c: &mut Criterion) {
    let store = LedgerStore::open(InMemoryStorage::new());
    let a = AccountNumber::from("0001");
    let b_acc = AccountNumber::from("0002");
    let amount = Decimal::from(1);

    c.bench_function("ledger_store_transfer_ping_pong", |b| {
        b.iter(|| {
            black_box(store.transfer(&a, &b_acc, amount)).ok();
            black_box(store.transfer(&b_acc, &a, amount)).ok();
        });
    });
}

criterion_group!(benches, bench_round_trips, bench_transfers);
criterion_main!(benches);
