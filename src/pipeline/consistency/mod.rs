// Consistency audit
// Cross-checks the document store and the vector index. The dual write at
// ingestion is not atomic, so the two stores can drift apart; this module
// reports the drift without mutating either store.


use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::database::lancedb::VectorStore;
use crate::database::sqlite::Database;
use crate::{DocvecError, Result};

/// Audit results comparing document store contents with the vector index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Number of documents in the document store
    pub stored_documents: usize,
    /// Number of vectors in the index
    pub indexed_vectors: usize,
    /// Document identifiers with no vector entry (orphan documents)
    pub missing_in_index: Vec<String>,
    /// Vector identifiers with no stored document (orphan vectors)
    pub orphaned_in_index: Vec<String>,
}

impl ConsistencyReport {
    /// Whether the two stores agree exactly.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.missing_in_index.is_empty() && self.orphaned_in_index.is_empty()
    }

    /// Total number of identifiers that exist in only one store.
    #[inline]
    pub fn total_issues(&self) -> usize {
        self.missing_in_index.len() + self.orphaned_in_index.len()
    }

    /// Human-readable summary for CLI output.
    #[inline]
    pub fn summary(&self) -> String {
        if self.is_consistent() {
            format!(
                "Stores are consistent: {} documents, {} vectors",
                self.stored_documents, self.indexed_vectors
            )
        } else {
            format!(
                "Store inconsistencies found: {} documents missing from the index, {} orphaned vectors in the index",
                self.missing_in_index.len(),
                self.orphaned_in_index.len()
            )
        }
    }
}

/// Performs the cross-store audit.
pub struct ConsistencyValidator<'a> {
    database: &'a Database,
    vector_store: &'a VectorStore,
}

impl<'a> ConsistencyValidator<'a> {
    /// Create a new validator over shared store handles.
    #[inline]
    pub fn new(database: &'a Database, vector_store: &'a VectorStore) -> Self {
        Self {
            database,
            vector_store,
        }
    }

    /// Compare the identifier sets of both stores and report the drift.
    #[inline]
    pub async fn validate(&self) -> Result<ConsistencyReport> {
        info!("Starting cross-store consistency validation");

        let document_ids = self
            .database
            .list_document_ids()
            .await
            .map_err(|e| DocvecError::Database(format!("failed to list document ids: {e}")))?;
        debug!("Found {} documents in the document store", document_ids.len());

        let vector_ids = self.vector_store.list_ids().await?;
        debug!("Found {} vectors in the index", vector_ids.len());

        let stored_set: HashSet<String> = document_ids.iter().cloned().collect();
        let indexed_set: HashSet<String> = vector_ids.iter().cloned().collect();

        let mut missing_in_index: Vec<String> =
            stored_set.difference(&indexed_set).cloned().collect();
        let mut orphaned_in_index: Vec<String> =
            indexed_set.difference(&stored_set).cloned().collect();

        // Set difference order is arbitrary; sort for stable reports
        missing_in_index.sort();
        orphaned_in_index.sort();

        let report = ConsistencyReport {
            stored_documents: document_ids.len(),
            indexed_vectors: vector_ids.len(),
            missing_in_index,
            orphaned_in_index,
        };

        if report.is_consistent() {
            info!("Consistency validation passed");
        } else {
            warn!(
                "Consistency validation found {} issues",
                report.total_issues()
            );
        }

        Ok(report)
    }
}
