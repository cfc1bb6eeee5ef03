// Application state shared across all route handlers
// Holds the long-lived store handles and the embedder, passed to handlers
// via axum's State extractor.

use std::sync::Arc;

use crate::database::lancedb::VectorStore;
use crate::database::sqlite::Database;
use crate::embeddings::EmbeddingModel;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. The stores
/// and the embedder are read-only handles safe to share between concurrent
/// requests.
#[derive(Clone)]
pub struct AppState {
    /// SQLite document store.
    pub database: Arc<Database>,
    /// LanceDB vector index.
    pub vector_store: Arc<VectorStore>,
    /// Text-to-vector capability, injected so tests can substitute a fake.
    pub embedder: Arc<dyn EmbeddingModel>,
}

impl AppState {
    /// Create a new AppState with the given components.
    #[inline]
    pub fn new(
        database: Database,
        vector_store: VectorStore,
        embedder: Arc<dyn EmbeddingModel>,
    ) -> Self {
        Self {
            database: Arc::new(database),
            vector_store: Arc::new(vector_store),
            embedder,
        }
    }
}
