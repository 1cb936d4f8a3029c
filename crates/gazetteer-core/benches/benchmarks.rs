//! Query benchmarks over a synthetic grid of cities.
//!
//! ```sh
//! cargo bench -p gazetteer-core --bench benchmarks
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gazetteer_core::prelude::*;
use std::hint::black_box;

const PREFIXES: [&str; 4] = ["Saint", "Mont", "Fort", "Villa"];

/// `side * side` cities on a 0.05 degree grid around central France.
fn grid_store(side: usize) -> FeatureStore {
    let store = FeatureStore::default();
    for i in 0..side {
        for j in 0..side {
            let n = i * side + j;
            let name = format!("{}-Ville {n}", PREFIXES[n % PREFIXES.len()]);
            let city = Feature::city(name)
                .with_feature_id(n as i64 + 1)
                .at(45.0 + i as f64 * 0.05, 2.0 + j as f64 * 0.05)
                .classified("P", "PPL")
                .municipality(n % 3 == 0);
            store.save(&city).expect("grid city saves");
        }
    }
    store.index().commit();
    store
}

fn nearest_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    for side in [30usize, 100] {
        let store = grid_store(side);
        let origin = Point::new(46.0, 3.0);
        for radius in [10_000.0, 100_000.0] {
            let query = NearestQuery::within(radius)
                .kind(FeatureKind::City)
                .paginate(Pagination::offset(0, 10));
            group.bench_with_input(
                BenchmarkId::new(format!("{}_features", side * side), radius as u64),
                &query,
                |b, q| b.iter(|| black_box(store.nearest_from(origin, q).expect("query runs"))),
            );
        }
    }
    group.finish();
}

fn text_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_text");
    let store = grid_store(100);
    for query in ["st ville 4242", "saint ville", "ville"] {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, q| {
            b.iter(|| black_box(store.search_text(*q, false, FeatureKind::City).expect("search runs")))
        });
    }
    group.finish();
}

fn normalize_bench(c: &mut Criterion) {
    c.bench_function("match_key", |b| {
        b.iter(|| black_box(match_key(black_box("Sainte-Marie-aux-Mines, Haut-Rhin"))))
    });
}

criterion_group!(benches, nearest_bench, text_bench, normalize_bench);
criterion_main!(benches);
