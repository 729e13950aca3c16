//! Compression benchmarks.
//!
//! Run with: `cargo bench`
//! Compare with baseline: `cargo bench -- --save-baseline main`
//! Compare against baseline: `cargo bench -- --baseline main`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Periodic English text (very compressible).
fn text_corpus(len: usize) -> Vec<u8> {
    b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

/// LCG pseudo-random bytes (practically incompressible).
fn random_corpus(len: usize) -> Vec<u8> {
    let mut x = 42u64;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            (x >> 33) as u8
        })
        .collect()
}

fn bench_compress_text(c: &mut Criterion) {
    let data = text_corpus(64 * 1024);

    let mut group = c.benchmark_group("compress");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("text_64k", |b| {
        b.iter(|| black_box(polypress::compress(black_box(&data))))
    });
    group.finish();
}

fn bench_compress_random(c: &mut Criterion) {
    let data = random_corpus(64 * 1024);

    let mut group = c.benchmark_group("compress");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("random_64k", |b| {
        b.iter(|| black_box(polypress::compress(black_box(&data))))
    });
    group.finish();
}

fn bench_compress_runs(c: &mut Criterion) {
    let data = vec![b'A'; 256 * 1024];

    let mut group = c.benchmark_group("compress");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("runs_256k", |b| {
        b.iter(|| black_box(polypress::compress(black_box(&data))))
    });
    group.finish();
}

fn bench_decompress_text(c: &mut Criterion) {
    let data = text_corpus(64 * 1024);
    let frame = polypress::compress(&data);

    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("text_64k", |b| {
        b.iter(|| black_box(polypress::decompress(black_box(&frame))))
    });
    group.finish();
}

fn bench_ppm_only(c: &mut Criterion) {
    let data = text_corpus(64 * 1024);

    let mut group = c.benchmark_group("ppm");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("order5_64k", |b| {
        b.iter(|| black_box(polypress::ppm::compress(black_box(&data), 5)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_compress_text,
    bench_compress_random,
    bench_compress_runs,
    bench_decompress_text,
    bench_ppm_only
);
criterion_main!(benches);
