// Retrieval pipeline
// Embeds a query, asks the vector index for the nearest neighbors, and
// joins each match back to its stored document. Purely read-path.


use tracing::{debug, warn};

use crate::database::lancedb::VectorStore;
use crate::database::sqlite::Database;
use crate::database::sqlite::models::Document;
use crate::embeddings::EmbeddingModel;
use crate::{DocvecError, Result};

/// Default number of neighbors returned when the caller does not say.
pub const DEFAULT_TOP_K: usize = 5;

/// One retrieval result: an index match joined with its stored document.
///
/// `document` is `None` when the index holds a vector whose identifier no
/// longer resolves in the document store. That is an expected state given
/// the non-atomic dual write at ingestion, so it degrades the single result
/// instead of failing the whole query.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedMatch {
    pub vector_id: String,
    pub file_name: String,
    pub score: f32,
    pub document: Option<Document>,
}

/// Answers top-K similarity queries with join-back to stored content.
pub struct SimilarityRetriever<'a> {
    database: &'a Database,
    vector_store: &'a VectorStore,
    embedder: &'a dyn EmbeddingModel,
}

impl<'a> SimilarityRetriever<'a> {
    /// Create a new retriever over shared store handles.
    #[inline]
    pub fn new(
        database: &'a Database,
        vector_store: &'a VectorStore,
        embedder: &'a dyn EmbeddingModel,
    ) -> Self {
        Self {
            database,
            vector_store,
            embedder,
        }
    }

    /// Return the `top_k` nearest stored documents for `query_text`,
    /// ordered by descending similarity score.
    #[inline]
    pub async fn retrieve(&self, query_text: &str, top_k: usize) -> Result<Vec<RetrievedMatch>> {
        let query_vector = self.embedder.encode(query_text).await?;

        let matches = self.vector_store.search_similar(&query_vector, top_k).await?;
        debug!("Vector index returned {} matches", matches.len());

        let mut results = Vec::with_capacity(matches.len());
        for vector_match in matches {
            let document = self
                .database
                .get_document_by_id(&vector_match.vector_id)
                .await
                .map_err(|e| {
                    DocvecError::Database(format!(
                        "failed to look up document {}: {}",
                        vector_match.vector_id, e
                    ))
                })?;

            if document.is_none() {
                warn!(
                    "Vector {} has no stored document, returning partial result",
                    vector_match.vector_id
                );
            }

            results.push(RetrievedMatch {
                vector_id: vector_match.vector_id,
                file_name: vector_match.file_name,
                score: vector_match.similarity_score,
                document,
            });
        }

        Ok(results)
    }
}
