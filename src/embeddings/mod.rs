// Embeddings module
// Wraps the text-to-vector capability behind an injectable contract

#[cfg(test)]
mod tests;

pub mod ollama;

pub use ollama::{DEFAULT_EMBEDDING_DIMENSION, OllamaClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{info, warn};

use crate::config::Config;
use crate::{DocvecError, Result};

/// Readiness of the embedding capability.
///
/// The state is established once at startup and checked before every
/// dispatch; a failed probe leaves the service running with embedding
/// operations reporting unavailability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelState {
    Uninitialized,
    Ready,
    Failed,
}

impl std::fmt::Display for ModelState {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ModelState::Uninitialized => write!(f, "Uninitialized"),
            ModelState::Ready => write!(f, "Ready"),
            ModelState::Failed => write!(f, "Failed"),
        }
    }
}

/// Text-to-vector capability consumed by the pipelines.
///
/// Implementations must be shareable across concurrent requests; encoding is
/// read-only with respect to the model.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Convert text into a fixed-length embedding vector
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Current readiness of the underlying model
    fn state(&self) -> ModelState;

    /// Dimensionality of vectors produced by this model
    fn dimension(&self) -> usize;
}

/// Ollama-backed embedder.
///
/// Owns the blocking HTTP client and bridges it onto the async runtime. The
/// readiness probe runs once at startup; encode refuses to dispatch unless
/// the probe succeeded.
#[derive(Debug, Clone)]
pub struct Embedder {
    client: OllamaClient,
    dimension: usize,
    state: ModelState,
}

impl Embedder {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let client = OllamaClient::new(config)?;

        Ok(Self {
            client,
            dimension: config.ollama.embedding_dimension as usize,
            state: ModelState::Uninitialized,
        })
    }

    /// Probe the backend and settle the readiness state.
    ///
    /// A failed probe is logged and leaves the embedder in `Failed`; the
    /// service keeps running so that health checks and non-embedding
    /// operations stay available.
    #[inline]
    pub async fn initialize(&mut self) {
        let client = self.client.clone();
        let outcome = tokio::task::spawn_blocking(move || client.health_check()).await;

        self.state = match outcome {
            Ok(Ok(())) => {
                info!("Embedding model {} is ready", self.client.model());
                ModelState::Ready
            }
            Ok(Err(e)) => {
                warn!("Could not initialize embedding model: {}", e);
                ModelState::Failed
            }
            Err(e) => {
                warn!("Embedding probe task failed: {}", e);
                ModelState::Failed
            }
        };
    }

    #[inline]
    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl EmbeddingModel for Embedder {
    #[inline]
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        if self.state != ModelState::Ready {
            return Err(DocvecError::ModelUnavailable(format!(
                "Embedding model is not ready (state: {})",
                self.state
            )));
        }

        let client = self.client.clone();
        let text = text.to_string();
        let embedding = tokio::task::spawn_blocking(move || client.generate_embedding(&text))
            .await
            .map_err(|e| DocvecError::Embedding(format!("Embedding task failed: {}", e)))??;

        if embedding.len() != self.dimension {
            return Err(DocvecError::Embedding(format!(
                "Model returned {} dimensions, expected {}",
                embedding.len(),
                self.dimension
            )));
        }

        Ok(embedding)
    }

    #[inline]
    fn state(&self) -> ModelState {
        self.state
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Deterministic embedder producing hash-derived unit vectors.
///
/// Identical inputs always produce identical outputs and distinct inputs
/// diverge, which is enough to exercise storage, retrieval, and clustering
/// without a live model.
#[derive(Debug, Clone)]
pub struct MockEmbedding {
    dimension: usize,
}

impl MockEmbedding {
    #[inline]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            i.hash(&mut hasher);
            let h = hasher.finish();
            let val = ((h as f64) / (u64::MAX as f64)) * 2.0 - 1.0;
            result.push(val as f32);
        }

        // L2-normalize so identical text has distance zero and unrelated
        // vectors stay comparable
        let norm: f32 = result.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut result {
                *val /= norm;
            }
        }

        result
    }
}

#[async_trait]
impl EmbeddingModel for MockEmbedding {
    #[inline]
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.hash_to_vector(text))
    }

    #[inline]
    fn state(&self) -> ModelState {
        ModelState::Ready
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }
}
