use criterion::{black_box, criterion_group, criterion_main, Criterion};
use venom_normalize::PathNormalizer;

const PATHS: &[&str] = &[
    "/api/v2/users/1234/orders/98765?expand=items",
    "/api/v2/users/5678/orders/12345/items/42",
    "/graphql",
    "/checkout/cart/abc123de-f456-7890-abcd-ef1234567890",
    "/static/assets/app.min.js",
    "/api/v2/users/1234/orders/98765?expand=items",
];

fn bench_cold_normalize(c: &mut Criterion) {
    c.bench_function("normalize_path_cold_cache", |b| {
        b.iter(|| {
            let normalizer = PathNormalizer::default();
            for path in PATHS {
                black_box(normalizer.normalize_path(black_box(path)));
            }
        });
    });
}

fn bench_warm_normalize(c: &mut Criterion) {
    let normalizer = PathNormalizer::default();
    for path in PATHS {
        normalizer.normalize_path(path);
    }
    c.bench_function("normalize_path_warm_cache", |b| {
        b.iter(|| {
            for path in PATHS {
                black_box(normalizer.normalize_path(black_box(path)));
            }
        });
    });
}

fn bench_with_method(c: &mut Criterion) {
    let normalizer = PathNormalizer::default();
    c.bench_function("normalize_with_method", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(PATHS[0]), black_box("POST"))));
    });
}

criterion_group!(
    benches,
    bench_cold_normalize,
    bench_warm_normalize,
    bench_with_method,
);
criterion_main!(benches);
