//! Benchmarks for route extraction and advisory synthesis.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use wayfarer_advisory::{AdvisoryEngine, Interpreter};
use wayfarer_core::config::AdvisoryConfig;
use wayfarer_core::types::{FallbackPolicy, Query, RouteHints};

/// Queries covering each rule: origin+destination, destination only, fallback.
fn sample_queries() -> Vec<Query> {
    [
        "What documents do I need to travel from USA to Japan?",
        "Traveling from United Kingdom to New Zealand next month",
        "Going to France for a conference, what visa do I need?",
        "Visiting Portugal next spring",
        "visa requirements for a long business stay",
        "Paris",
    ]
    .iter()
    .map(|q| Query::parse(q).expect("sample queries are non-empty"))
    .collect()
}

/// A long question with the route buried at the end.
fn long_query() -> Query {
    let filler = "I have a few questions about paperwork and insurance and timing ".repeat(20);
    Query::parse(&format!("{filler} before I travel from Argentina to Chile"))
        .expect("long query is non-empty")
}

fn bench_interpret(c: &mut Criterion) {
    let interpreter = Interpreter::new(FallbackPolicy::RawQuery);
    let queries = sample_queries();
    let long = long_query();

    let mut group = c.benchmark_group("interpret");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("mixed_queries", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let route = interpreter.interpret(&queries[idx % queries.len()]);
            idx += 1;
            route
        });
    });

    group.bench_function("long_query", |b| b.iter(|| interpreter.interpret(&long)));

    group.finish();
}

fn bench_advise(c: &mut Criterion) {
    let engine = AdvisoryEngine::new(&AdvisoryConfig::default());
    let queries = sample_queries();
    let hints = RouteHints::default();

    let mut group = c.benchmark_group("advise");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("interpret_and_synthesize", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let record = engine.advise(&queries[idx % queries.len()], &hints);
            idx += 1;
            record
        });
    });

    group.finish();
}

criterion_group!(benches, bench_interpret, bench_advise);
criterion_main!(benches);
