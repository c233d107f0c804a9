//! Benchmarks for the turn pipeline and visibility.
//!
//! End-turn and full visibility recomputes run after every mutation, so
//! they are the hot path on a live board.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use frontier::game::{PlayerHandle, end_turn, visibility};
use frontier::{RulesConfig, WorldConfig, worldgen};

fn bench_end_turn(c: &mut Criterion) {
    let rules = RulesConfig::default();
    let board =
        worldgen::generate(&WorldConfig::default(), &rules, 42).expect("default world generates");
    let player = PlayerHandle::new("bench");

    c.bench_function("end_turn_24x18", |b| {
        b.iter_batched(
            || board.clone(),
            |mut board| {
                let report = end_turn(&mut board, black_box(&rules), &player);
                black_box(report)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_twenty_turns(c: &mut Criterion) {
    let rules = RulesConfig::default();
    let board =
        worldgen::generate(&WorldConfig::default(), &rules, 7).expect("default world generates");
    let player = PlayerHandle::new("bench");

    c.bench_function("twenty_turns_24x18", |b| {
        b.iter_batched(
            || board.clone(),
            |mut board| {
                for _ in 0..20 {
                    end_turn(&mut board, &rules, &player);
                }
                black_box(board)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_visibility(c: &mut Criterion) {
    let world = WorldConfig {
        cols: 48,
        rows: 36,
        ..WorldConfig::default()
    };
    let mut board =
        worldgen::generate(&world, &RulesConfig::default(), 3).expect("default world generates");

    c.bench_function("visibility_recompute_48x36", |b| {
        b.iter(|| black_box(visibility::recompute(black_box(&mut board))));
    });
}

criterion_group!(benches, bench_end_turn, bench_twenty_turns, bench_visibility);
criterion_main!(benches);
