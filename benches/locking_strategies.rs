//! Benchmark suite for comparing locking strategies
//!
//! This benchmark compares the pessimistic and optimistic transfer
//! strategies using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! # Workloads
//!
//! Two representative shapes:
//! - `pair` - repeated transfers bouncing between two records
//! - `fanout` - transfers from one hot source record to eight targets
//!
//! Contention is single-threaded here; the benchmarks measure strategy
//! overhead (lock table vs version retries), not scheduler behavior.

use benefits_engine::cli::LockingType;
use benefits_engine::core::TransferEngine;
use benefits_engine::strategy::{create_strategy, LockingConfig};
use benefits_engine::types::BenefitDraft;
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

fn engine(locking: LockingType) -> TransferEngine {
    TransferEngine::new(create_strategy(locking, LockingConfig::default()))
}

fn seed(engine: &TransferEngine, count: usize) {
    for i in 0..count {
        engine
            .create(BenefitDraft {
                name: format!("Benefit {i}"),
                description: None,
                balance: Decimal::new(100_000_000, 2),
                active: None,
            })
            .expect("seeding failed");
    }
}

fn run_pair(locking: LockingType) {
    let engine = engine(locking);
    seed(&engine, 2);
    let amount = Decimal::new(100, 2);

    for i in 0..1_000u64 {
        let (from, to) = if i % 2 == 0 { (1, 2) } else { (2, 1) };
        engine.transfer(from, to, amount).expect("transfer failed");
    }
}

fn run_fanout(locking: LockingType) {
    let engine = engine(locking);
    seed(&engine, 9);
    let amount = Decimal::new(100, 2);

    for i in 0..800u64 {
        let to = 2 + (i % 8);
        engine.transfer(1, to, amount).expect("transfer failed");
    }
}

/// Benchmark pessimistic strategy with the two-record pair workload
#[divan::bench]
fn pessimistic_pair() {
    run_pair(LockingType::Pessimistic);
}

/// Benchmark optimistic strategy with the two-record pair workload
#[divan::bench]
fn optimistic_pair() {
    run_pair(LockingType::Optimistic);
}

/// Benchmark pessimistic strategy with the hot-source fanout workload
#[divan::bench]
fn pessimistic_fanout() {
    run_fanout(LockingType::Pessimistic);
}

/// Benchmark optimistic strategy with the hot-source fanout workload
#[divan::bench]
fn optimistic_fanout() {
    run_fanout(LockingType::Optimistic);
}
