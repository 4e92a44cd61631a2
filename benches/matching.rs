//! Criterion benchmarks for filter decode and matching throughput.
use criterion::{criterion_group, criterion_main, Criterion};
use jsonmatch::filter::decode::decode;
use jsonmatch::filter::matcher::matches;
use serde_json::{json, Value};
use std::hint::black_box;

fn wire_filter() -> Value {
    json!({
        "filterType": "and",
        "filters": [
            {"filterType": "greaterOrEqual", "field": "age", "value": 18},
            {
                "filterType": "substring",
                "field": ["profile", "bio"],
                "contains": ["rust", "json"],
            },
            {
                "filterType": "not",
                "filter": {"filterType": "present", "field": "deleted"},
            },
        ],
    })
}

fn documents() -> Vec<Value> {
    (0..256)
        .map(|i| {
            json!({
                "age": i % 90,
                "profile": {
                    "bio": format!(
                        "user {i} writes Rust and wrangles JSON all day"
                    ),
                },
                "tags": ["a", "b", "c"],
            })
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let wire = wire_filter();
    c.bench_function("decode nested filter", |b| {
        b.iter(|| decode(black_box(&wire)).expect("well-formed filter"));
    });
}

fn bench_matching(c: &mut Criterion) {
    let filter = decode(&wire_filter()).expect("well-formed filter");
    let docs = documents();
    c.bench_function("match 256 documents", |b| {
        b.iter(|| {
            docs.iter()
                .filter(|doc| matches(black_box(&filter), doc))
                .count()
        });
    });
}

criterion_group!(benches, bench_decode, bench_matching);
criterion_main!(benches);
