//! Benchmarks for hostmatrix resolution.
//!
//! Run with: cargo bench
//!
//! Measures the per-request lookup cost, which sits on the hot path of every
//! network request, plus toggles and snapshot rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hostmatrix::{CellState, Matrix, RequestType, TextCodec};

/// Build a matrix with `count` source-specific rules plus a few global ones.
fn generate_matrix(count: usize) -> Matrix {
    let mut matrix = Matrix::new();
    matrix.set_cell("*", "*", RequestType::ThirdPartyFrame, CellState::Block);
    matrix.set_cell("*", "*", RequestType::ThirdPartyScript, CellState::Block);

    for i in 0..count {
        let state = match i % 3 {
            0 => CellState::Allow,
            1 => CellState::Block,
            _ => CellState::Noop,
        };
        let src = format!("site{}.example.com", i);
        let des = format!("cdn{}.net", i % 50);
        matrix.set_cell(&src, &des, RequestType::ThirdPartyScript, state);
        matrix.set_cell(&src, "*", RequestType::Image, state);
    }

    matrix
}

/// Query pairs, some hitting exact rules and some falling through to `*`.
fn generate_queries(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                (
                    format!("www.site{}.example.com", i),
                    format!("static.cdn{}.net", i % 50),
                )
            } else {
                (
                    format!("deep.sub.unknown{}.org", i),
                    format!("a.b.c.tracker{}.com", i),
                )
            }
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let matrix = generate_matrix(10_000);
    let queries = generate_queries(1000);

    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(queries.len() as u64));

    group.bench_function("mixed_queries", |b| {
        b.iter(|| {
            for (src, des) in &queries {
                black_box(matrix.resolve(src, des, RequestType::ThirdPartyScript));
            }
        })
    });

    group.bench_function("miss_to_unresolved", |b| {
        b.iter(|| {
            for (src, des) in &queries {
                black_box(matrix.resolve(src, des, RequestType::InlineScript));
            }
        })
    });

    group.finish();
}

fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let matrix = generate_matrix(*size);
        let queries = generate_queries(100);

        group.throughput(Throughput::Elements(100));
        group.bench_with_input(BenchmarkId::new("rules", size), size, |b, _| {
            b.iter(|| {
                for (src, des) in &queries {
                    black_box(matrix.resolve(src, des, RequestType::Image));
                }
            })
        });
    }

    group.finish();
}

fn bench_toggle(c: &mut Criterion) {
    let mut matrix = generate_matrix(10_000);

    c.bench_function("block_allow_toggle", |b| {
        b.iter(|| {
            matrix.block_cell("www.site7.example.com", "x.cdn7.net", RequestType::ThirdPartyScript);
            matrix.allow_cell("www.site7.example.com", "x.cdn7.net", RequestType::ThirdPartyScript);
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let matrix = generate_matrix(10_000);
    let codec = TextCodec::new();

    c.bench_function("render_10k", |b| b.iter(|| black_box(codec.render(&matrix))));

    let text = codec.render(&matrix);
    c.bench_function("parse_10k", |b| b.iter(|| black_box(codec.parse(&text))));
}

criterion_group!(benches, bench_resolve, bench_scalability, bench_toggle, bench_render);

criterion_main!(benches);
