use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lzb::{compress_to_vec, decompress_to_vec, Config};
use rand::prelude::*;

fn criterion_benchmark(c: &mut Criterion) {
    let mut data = vec![0u8; 16_384];
    thread_rng().fill(&mut data[4_096..12_288]); // noise in the middle, runs at the ends

    let cfg = Config::default();
    let compressed = compress_to_vec(&cfg, &data).unwrap();

    c.bench_function("encode 16k mixed", |b| {
        b.iter(|| compress_to_vec(&cfg, black_box(&data)))
    });

    let mut group = c.benchmark_group("decode");
    group.bench_with_input("16k mixed", &compressed.as_slice(), |b, c| {
        b.iter(|| decompress_to_vec(&cfg, c))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
