//! Benchmarks for world generation.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use frontier::{RulesConfig, WorldConfig, worldgen};

fn bench_generate(c: &mut Criterion) {
    let rules = RulesConfig::default();
    let mut group = c.benchmark_group("generate");
    for (cols, rows) in [(10u16, 10u16), (24, 18), (64, 48)] {
        let world = WorldConfig {
            cols,
            rows,
            ..WorldConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{rows}")),
            &world,
            |b, world| {
                b.iter(|| worldgen::generate(black_box(world), &rules, black_box(42)));
            },
        );
    }
    group.finish();
}

fn bench_rivers_heavy(c: &mut Criterion) {
    // Every band-4 mountain sources a river.
    let world = WorldConfig {
        river_source_chance: 1.0,
        ..WorldConfig::default()
    };
    let rules = RulesConfig::default();

    c.bench_function("generate_all_rivers_24x18", |b| {
        b.iter(|| worldgen::generate(black_box(&world), &rules, black_box(5)));
    });
}

criterion_group!(benches, bench_generate, bench_rivers_heavy);
criterion_main!(benches);
