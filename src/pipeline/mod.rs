// Pipeline module
// Orchestrates ingestion, retrieval, clustering, and consistency auditing
// over the embedder, document store, and vector index.

pub mod clustering;
pub mod consistency;
pub mod ingest;
pub mod retrieval;

pub use clustering::ClusterAnalyzer;
pub use consistency::{ConsistencyReport, ConsistencyValidator};
pub use ingest::{DocumentIngestor, IngestReceipt};
pub use retrieval::{RetrievedMatch, SimilarityRetriever};
