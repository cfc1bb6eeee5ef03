use criterion::{Criterion, criterion_group, criterion_main};
use docvec::pipeline::clustering::kmeans::{KMeansConfig, mini_batch_kmeans};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn synthetic_vectors(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|_| (0..dimension).map(|_| rng.random_range(-1.0f32..1.0)).collect())
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let small = synthetic_vectors(100, 64);
    let large = synthetic_vectors(2_000, 64);

    c.bench_function("kmeans_100_vectors_k5", |b| {
        let config = KMeansConfig::with_clusters(5);
        b.iter(|| mini_batch_kmeans(black_box(&small), black_box(&config)))
    });

    c.bench_function("kmeans_2000_vectors_k5", |b| {
        let config = KMeansConfig::with_clusters(5);
        b.iter(|| mini_batch_kmeans(black_box(&large), black_box(&config)))
    });

    c.bench_function("kmeans_2000_vectors_k20", |b| {
        let config = KMeansConfig::with_clusters(20);
        b.iter(|| mini_batch_kmeans(black_box(&large), black_box(&config)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
