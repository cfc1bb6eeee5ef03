// Ingestion pipeline
// Reads a document from disk, embeds its content, and dual-writes it to the
// document store and the vector index under a freshly generated identifier.


use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::lancedb::{EmbeddingRecord, VectorMetadata, VectorStore};
use crate::database::sqlite::Database;
use crate::database::sqlite::models::NewDocument;
use crate::embeddings::EmbeddingModel;
use crate::{DocvecError, Result};

/// Outcome of a successful ingestion: the generated identifier and the file
/// name the document was ingested under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    pub document_id: String,
    pub file_name: String,
}

/// Supported document source formats, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Json,
    Text,
}

/// Ingests documents by file path into the document store and vector index.
pub struct DocumentIngestor<'a> {
    database: &'a Database,
    vector_store: &'a VectorStore,
    embedder: &'a dyn EmbeddingModel,
}

impl<'a> DocumentIngestor<'a> {
    /// Create a new ingestor over shared store handles.
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

    /// Ingest the file at `file_path`.
    ///
    /// The extension is validated before the filesystem is touched, the
    /// content is validated (and canonicalized, for JSON) before the
    /// embedder runs, and the embedder runs before any write. The document
    /// store commit happens first; the vector index upsert follows. A
    /// failed index write after the store commit leaves an orphan document
    /// behind and is reported to the caller rather than retried.
    #[inline]
    pub async fn ingest(&self, file_path: &str) -> Result<IngestReceipt> {
        let path = Path::new(file_path);
        let kind = classify_extension(path)?;

        let raw = read_file_text(path).await?;
        let content = normalize_content(path, kind, raw)?;

        debug!("Generating embedding for {}", path.display());
        let embedding = self.embedder.encode(&content).await?;

        let document_id = Uuid::new_v4().to_string();
        let file_name = file_name_of(path);

        let new_document = NewDocument {
            id: document_id.clone(),
            file_name: file_name.clone(),
            content,
        };
        self.database
            .insert_document(&new_document)
            .await
            .map_err(|e| DocvecError::Database(format!("failed to store document: {e}")))?;

        let record = EmbeddingRecord {
            id: document_id.clone(),
            vector: embedding,
            metadata: VectorMetadata {
                file_name: file_name.clone(),
                created_at: Utc::now().to_rfc3339(),
            },
        };

        if let Err(e) = self.vector_store.upsert_embedding(record).await {
            warn!(
                "Index write failed after store commit, document {} is orphaned: {}",
                document_id, e
            );
            return Err(DocvecError::VectorIndex(format!(
                "document {document_id} was stored but not indexed: {e}"
            )));
        }

        info!("Ingested {} as document {}", file_name, document_id);

        Ok(IngestReceipt {
            document_id,
            file_name,
        })
    }
}

/// Determine the source format from the file extension, case-insensitively.
///
/// Runs before any filesystem access so that an unsupported extension is
/// reported as such even when the path does not exist.
fn classify_extension(path: &Path) -> Result<SourceKind> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(SourceKind::Json),
        Some("txt") => Ok(SourceKind::Text),
        _ => Err(DocvecError::UnsupportedType(format!(
            "{} (supported: .json, .txt)",
            path.display()
        ))),
    }
}

async fn read_file_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocvecError::FileNotFound(path.display().to_string())
        } else {
            DocvecError::Io(e)
        }
    })?;

    String::from_utf8(bytes).map_err(|_| {
        DocvecError::InvalidFormat(format!("{} is not valid UTF-8", path.display()))
    })
}

/// Validate and normalize the raw file content.
///
/// JSON documents are parsed and re-serialized into a canonical compact
/// form with sorted object keys, so that equivalent payloads embed and
/// store identically. Text documents are kept verbatim.
fn normalize_content(path: &Path, kind: SourceKind, raw: String) -> Result<String> {
    match kind {
        SourceKind::Json => {
            let value: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| DocvecError::InvalidFormat(format!("{}: {}", path.display(), e)))?;
            serde_json::to_string(&sort_object_keys(value))
                .map_err(|e| DocvecError::InvalidFormat(format!("{}: {}", path.display(), e)))
        }
        SourceKind::Text => Ok(raw),
    }
}

/// Recursively rebuild every object with its keys in sorted order.
///
/// Key order must not depend on how `serde_json`'s map type is configured,
/// so the entries are sorted explicitly before re-insertion.
fn sort_object_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(String, serde_json::Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_object_keys(value)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(sort_object_keys).collect())
        }
        other => other,
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
