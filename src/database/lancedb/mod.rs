// LanceDB vector database module
// Handles vector storage and similarity search for embeddings

#[cfg(test)]
mod tests;

pub mod vector_store;

pub use vector_store::VectorStore;

use serde::{Deserialize, Serialize};

/// Embedding record stored in LanceDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Unique identifier, equal to the id of the stored document
    pub id: String,
    /// The vector embedding
    pub vector: Vec<f32>,
    /// Metadata about the document this embedding represents
    pub metadata: VectorMetadata,
}

/// Metadata stored alongside an embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorMetadata {
    /// Original file name of the ingested document
    pub file_name: String,
    /// Timestamp when this embedding was created
    pub created_at: String,
}
