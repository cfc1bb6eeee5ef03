// Clustering pipeline
// Fetches the entire vector population from the index and partitions it
// into clusters with seeded mini-batch k-means. Nothing is persisted; the
// assignment is recomputed from scratch on every request.


pub mod kmeans;

use std::collections::HashMap;

use tracing::{debug, info};

use crate::database::lancedb::VectorStore;
use crate::{DocvecError, Result};

use kmeans::{KMeansConfig, mini_batch_kmeans};

/// Default number of clusters when the caller does not say.
pub const DEFAULT_CLUSTERS: usize = 5;

/// Computes on-demand cluster assignments over the full vector index.
pub struct ClusterAnalyzer<'a> {
    vector_store: &'a VectorStore,
}

impl<'a> ClusterAnalyzer<'a> {
    /// Create a new analyzer over a shared vector store handle.
    #[inline]
    pub fn new(vector_store: &'a VectorStore) -> Self {
        Self { vector_store }
    }

    /// Assign every indexed vector to one of `n_clusters` clusters.
    ///
    /// Returns a mapping from vector identifier to cluster label. An empty
    /// index yields an empty mapping without running the algorithm. Labels
    /// lie in `[0, min(n_clusters, population))`; repeated runs over the
    /// same data produce the same assignment.
    #[inline]
    pub async fn cluster_documents(&self, n_clusters: usize) -> Result<HashMap<String, usize>> {
        let records = self.vector_store.fetch_all().await?;
        if records.is_empty() {
            debug!("Vector index is empty, nothing to cluster");
            return Ok(HashMap::new());
        }

        let (ids, vectors): (Vec<String>, Vec<Vec<f32>>) = records.into_iter().unzip();
        let config = KMeansConfig::with_clusters(n_clusters);

        info!(
            "Clustering {} vectors into {} clusters",
            vectors.len(),
            config.n_clusters.min(vectors.len())
        );

        // CPU-bound loop, keep it off the async workers
        let labels = tokio::task::spawn_blocking(move || mini_batch_kmeans(&vectors, &config))
            .await
            .map_err(|e| DocvecError::Other(anyhow::anyhow!("clustering task failed: {e}")))?;

        Ok(ids.into_iter().zip(labels).collect())
    }
}
