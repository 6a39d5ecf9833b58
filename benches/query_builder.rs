//! Benchmarks for search planning and SQL compilation.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use compsearch::query::{
    ChampionCost, ChampionFilter, DamageType, RangeType, SearchCompsOptions, SearchPlan,
    TraitFilter, TraitMode, VariableChampionFilter, parse_champion_ids,
};

fn cost(n: u8) -> ChampionCost {
    ChampionCost::new(n).unwrap()
}

fn variable(i: i64) -> ChampionFilter {
    ChampionFilter::Variable(VariableChampionFilter {
        costs: Some(vec![cost(1 + (i % 5) as u8)]),
        damage_type: Some(if i % 2 == 0 { DamageType::Ad } else { DamageType::Ap }),
        range_type: Some(RangeType::Melee),
        traits: Some(TraitFilter {
            ids: vec![i, i + 1, i + 2],
            mode: TraitMode::And,
        }),
    })
}

fn options_with(filters: usize) -> SearchCompsOptions {
    let mut opts = SearchCompsOptions::new().sizes([7, 8]).max_cost(cost(4)).offset(200);
    for i in 0..filters as i64 {
        opts = opts.champion(if i % 2 == 0 {
            ChampionFilter::Single { id: Some(i) }
        } else {
            variable(i)
        });
    }
    opts
}

/// Benchmark option validation and planning.
fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    group.bench_function("no_options", |b| {
        b.iter(|| black_box(SearchPlan::from_options(None).unwrap()))
    });

    for filters in [1, 4, 9] {
        let opts = options_with(filters);
        group.bench_with_input(BenchmarkId::new("champion_filters", filters), &opts, |b, opts| {
            b.iter(|| black_box(SearchPlan::from_options(Some(black_box(opts))).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark compiling a plan to SQL.
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for filters in [0, 4, 9] {
        let plan = SearchPlan::from_options(Some(&options_with(filters))).unwrap();
        group.bench_with_input(BenchmarkId::new("sqlite", filters), &plan, |b, plan| {
            b.iter(|| black_box(plan.to_sql().unwrap()))
        });
    }

    group.finish();
}

/// Benchmark splitting concatenated member ids.
fn bench_parse_members(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_champion_ids");

    for size in [1usize, 8, 10] {
        let joined = (0..size).map(|i| (i * 13).to_string()).collect::<Vec<_>>().join(",");
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &joined, |b, joined| {
            b.iter(|| black_box(parse_champion_ids(black_box(joined)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan, bench_compile, bench_parse_members);
criterion_main!(benches);
