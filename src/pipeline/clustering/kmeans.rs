// Seeded mini-batch k-means over fixed-dimension f32 vectors.
//
// Centroids are refined from small random batches per iteration with a
// per-centroid decaying learning rate, then every vector is assigned to
// its nearest centroid in one final full pass.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed seed so repeated runs over the same data produce the same labels.
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Tuning parameters for a mini-batch k-means run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KMeansConfig {
    pub n_clusters: usize,
    pub batch_size: usize,
    pub max_iterations: usize,
    pub seed: u64,
}

impl KMeansConfig {
    /// Standard configuration with `n_clusters` centroids.
    #[inline]
    pub fn with_clusters(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            batch_size: DEFAULT_BATCH_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

/// Cluster `vectors` and return one label per vector, in input order.
///
/// The effective cluster count is clamped to `[1, vectors.len()]`, so every
/// label lies in `[0, min(n_clusters, vectors.len()))`. An empty input
/// yields an empty label vector. All vectors must share one dimension.
#[inline]
pub fn mini_batch_kmeans(vectors: &[Vec<f32>], config: &KMeansConfig) -> Vec<usize> {
    if vectors.is_empty() {
        return Vec::new();
    }

    let k = config.n_clusters.clamp(1, vectors.len());
    let batch_size = config.batch_size.clamp(1, vectors.len());
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut centroids = init_centroids(vectors, k, &mut rng);
    let mut assignment_counts = vec![0_u64; k];

    for _ in 0..config.max_iterations {
        for _ in 0..batch_size {
            let point = &vectors[rng.random_range(0..vectors.len())];
            let center = nearest_centroid(point, &centroids);

            assignment_counts[center] += 1;
            let learning_rate = 1.0 / assignment_counts[center] as f32;

            for (coordinate, value) in centroids[center].iter_mut().zip(point) {
                *coordinate += learning_rate * (value - *coordinate);
            }
        }
    }

    vectors
        .iter()
        .map(|vector| nearest_centroid(vector, &centroids))
        .collect()
}

/// k-means++ seeding: spread the initial centroids out by sampling each
/// next centroid proportionally to its squared distance from the ones
/// already chosen.
fn init_centroids(vectors: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(vectors[rng.random_range(0..vectors.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = vectors
            .iter()
            .map(|vector| {
                centroids
                    .iter()
                    .map(|centroid| f64::from(squared_distance(vector, centroid)))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            // Every vector coincides with an existing centroid
            centroids.push(vectors[rng.random_range(0..vectors.len())].clone());
            continue;
        }

        let mut threshold = rng.random::<f64>() * total;
        let mut chosen = vectors.len() - 1;
        for (index, weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold <= 0.0 {
                chosen = index;
                break;
            }
        }
        centroids.push(vectors[chosen].clone());
    }

    centroids
}

fn nearest_centroid(vector: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(vector, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let difference = x - y;
            difference * difference
        })
        .sum()
}
