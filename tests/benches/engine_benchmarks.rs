//! # Capacity-Chain Engine Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | pc-06 Transaction Engine | validate | < 10µs per tx |
//! | pc-06 Transaction Engine | reserve + release | < 10µs per tx |
//! | pc-06 Transaction Engine | apply (block close) | < 50µs per tx |
//! | pc-04 Account Store | balance mutation | < 5µs |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use pc_04_account_store::AccountStore;
use pc_06_transaction_engine::{Attachment, Message, Transaction, TransactionEngineApi};
use pc_tests::fixtures::{account_of, builder, payment, Ledger};
use rand::Rng;
use shared_types::ONE_COIN;
use std::time::Duration;

fn random_payments(count: usize, senders: u8) -> Vec<Transaction> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let from = rng.gen_range(1..=senders);
            let to = rng.gen_range(1..=senders);
            builder(from, Attachment::OrdinaryPayment { amount: rng.gen_range(1..ONE_COIN) })
                .recipient(account_of(to))
                .timestamp(i as u32)
                .build()
        })
        .collect()
}

// ============================================================================
// PC-06: Validation
// ============================================================================

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-06-validate");
    group.measurement_time(Duration::from_secs(5));

    let ledger = Ledger::new();
    ledger.fund(1, 100 * ONE_COIN);

    let plain = payment(1, 2, ONE_COIN);
    group.bench_function("payment", |b| {
        b.iter(|| black_box(ledger.engine.validate(black_box(&plain)).is_ok()))
    });

    for len in [0usize, 160, 1000] {
        let tx = builder(1, Attachment::ArbitraryMessage)
            .recipient(account_of(2))
            .message(Message::binary(vec![0xAB; len]))
            .fee(10 * ONE_COIN)
            .build();
        group.bench_with_input(BenchmarkId::new("message", len), &tx, |b, tx| {
            b.iter(|| black_box(ledger.engine.validate(tx).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// PC-06: Reservation
// ============================================================================

fn bench_reserve_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-06-reservation");
    group.measurement_time(Duration::from_secs(5));

    for size in [10usize, 100, 1000] {
        let mut ledger = Ledger::new();
        for n in 1..=16 {
            ledger.fund(n, 10_000 * ONE_COIN);
        }
        let txs = random_payments(size, 16);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("reserve_release", size), &txs, |b, txs| {
            b.iter(|| {
                let mut admitted = 0u32;
                for tx in txs {
                    if ledger.engine.apply_unconfirmed(tx) {
                        admitted += 1;
                    }
                }
                for tx in txs.iter().rev() {
                    let _ = ledger.engine.undo_unconfirmed(tx);
                }
                black_box(admitted)
            })
        });
    }

    group.finish();
}

// ============================================================================
// PC-06: Block Close
// ============================================================================

fn bench_block_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-06-block-apply");
    group.measurement_time(Duration::from_secs(10));

    for size in [100usize, 1000] {
        let txs = random_payments(size, 32);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("apply_block", size), &txs, |b, txs| {
            b.iter_batched(
                || {
                    let mut ledger = Ledger::new();
                    for n in 1..=32 {
                        ledger.fund(n, 10_000 * ONE_COIN);
                    }
                    ledger.engine.start_new_block();
                    for tx in txs {
                        ledger.engine.apply_unconfirmed(tx);
                    }
                    ledger
                },
                |mut ledger| {
                    for tx in txs {
                        let _ = ledger.engine.apply(tx);
                    }
                    black_box(ledger.store.total_balance())
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// PC-04: Account Store
// ============================================================================

fn bench_store_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-04-account-store");

    let ledger = Ledger::new();
    let id = ledger.fund(1, 1_000 * ONE_COIN);

    group.bench_function("add_to_balance_and_unconfirmed", |b| {
        b.iter(|| {
            let _ = ledger.store.add_to_balance_and_unconfirmed(id, black_box(1));
            let _ = ledger.store.add_to_balance_and_unconfirmed(id, black_box(-1));
        })
    });

    group.bench_function("get", |b| b.iter(|| black_box(ledger.store.get(id))));

    group.finish();
}

criterion_group!(
    benches,
    bench_validate,
    bench_reserve_release,
    bench_block_apply,
    bench_store_mutation
);
criterion_main!(benches);
