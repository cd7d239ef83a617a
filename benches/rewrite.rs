//! Throughput benchmark for the rewrite pipeline.
//!
//! The host invokes the preprocessor once per binding string, so a single
//! rewrite must stay cheap relative to tree size. Measures the full
//! parse → rewrite → emit path plus the memoized variant.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dearrow::{rewrite_source, RewriteCache, RewriteOptions};

/// Build a deeply nested arrow chain: `a0 => a1 => ... => a0 + aN`.
fn nested_arrows(depth: usize) -> String {
    let mut source = String::new();
    for i in 0..depth {
        source.push_str(&format!("a{} => ", i));
    }
    source.push_str(&format!("a0 + a{}", depth.saturating_sub(1)));
    source
}

fn bench_rewrite(c: &mut Criterion) {
    c.bench_function("rewrite_no_arrow", |b| {
        b.iter(|| rewrite_source(black_box("items().length")))
    });

    c.bench_function("rewrite_simple_arrow", |b| {
        b.iter(|| rewrite_source(black_box("x => x + 1")))
    });

    c.bench_function("rewrite_binding_object", |b| {
        b.iter(|| {
            rewrite_source(black_box(
                "{ text: x => x.name, visible: () => items().length > 0, css: ready ? 'on' : 'off' }",
            ))
        })
    });

    let deep = nested_arrows(16);
    c.bench_function("rewrite_nested_arrows_16", |b| {
        b.iter(|| rewrite_source(black_box(&deep)))
    });

    c.bench_function("rewrite_cached_hit", |b| {
        let mut cache = RewriteCache::new(RewriteOptions::default());
        cache.rewrite("x => x + 1").unwrap();
        b.iter(|| cache.rewrite(black_box("x => x + 1")))
    });
}

criterion_group!(benches, bench_rewrite);
criterion_main!(benches);
