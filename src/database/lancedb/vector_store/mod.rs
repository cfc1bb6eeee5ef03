#[cfg(test)]
mod tests;

use super::EmbeddingRecord;
use crate::{DocvecError, config::Config};
use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use lancedb::{
    Connection,
    query::{ExecutableQuery, QueryBase},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Vector database store using LanceDB for similarity search
pub struct VectorStore {
    connection: Connection,
    table_name: String,
    vector_dimension: usize,
}

/// Search result from vector similarity search
#[derive(Debug, Clone)]
pub struct VectorMatch {
    pub vector_id: String,
    pub file_name: String,
    pub similarity_score: f32,
    pub distance: f32,
}

impl VectorStore {
    /// Create a new VectorStore instance
    ///
    /// The vector dimension is fixed from configuration for the lifetime of
    /// the store; an existing table with a different dimension is rejected
    /// rather than silently recreated, since mixing embedding models
    /// invalidates similarity comparisons.
    #[inline]
    pub async fn new(config: &Config) -> Result<Self, DocvecError> {
        let db_path = config.vector_database_path();
        debug!("Initializing LanceDB at path: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DocvecError::VectorIndex(format!(
                    "Failed to create vector database directory: {}",
                    e
                ))
            })?;
        }

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to connect to LanceDB: {}", e)))?;

        let store = Self {
            connection,
            table_name: "embeddings".to_string(),
            vector_dimension: config.ollama.embedding_dimension as usize,
        };

        store.initialize_table().await?;

        info!(
            "Vector store initialized with dimension {}",
            store.vector_dimension
        );
        Ok(store)
    }

    /// Dimension every stored vector must have
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vector_dimension
    }

    /// Create the embeddings table if it does not exist yet
    async fn initialize_table(&self) -> Result<(), DocvecError> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to list tables: {}", e)))?;

        if table_names.contains(&self.table_name) {
            let existing = self.detect_existing_vector_dimension().await?;
            if existing != self.vector_dimension {
                return Err(DocvecError::VectorIndex(format!(
                    "Existing table has vector dimension {} but configuration expects {}",
                    existing, self.vector_dimension
                )));
            }
            debug!("Embeddings table already exists with dimension {}", existing);
            return Ok(());
        }

        let schema = self.create_schema();
        self.connection
            .create_empty_table(&self.table_name, schema)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to create table: {}", e)))?;

        info!(
            "Embeddings table created with {} dimensions",
            self.vector_dimension
        );
        Ok(())
    }

    /// Detect vector dimension from the existing table schema
    async fn detect_existing_vector_dimension(&self) -> Result<usize, DocvecError> {
        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| {
                DocvecError::VectorIndex(format!("Failed to open existing table: {}", e))
            })?;

        let schema = table
            .schema()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to get table schema: {}", e)))?;

        for field in schema.fields() {
            if field.name() == "vector" {
                if let DataType::FixedSizeList(_, size) = field.data_type() {
                    return Ok(*size as usize);
                }
            }
        }

        Err(DocvecError::VectorIndex(
            "Could not find vector column or determine dimension".to_string(),
        ))
    }

    fn create_schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    self.vector_dimension as i32,
                ),
                false,
            ),
            Field::new("file_name", DataType::Utf8, false),
            Field::new("created_at", DataType::Utf8, false),
        ]))
    }

    /// Insert or replace the embedding stored under `record.id`
    #[inline]
    pub async fn upsert_embedding(&self, record: EmbeddingRecord) -> Result<(), DocvecError> {
        if record.vector.len() != self.vector_dimension {
            return Err(DocvecError::VectorIndex(format!(
                "Vector dimension mismatch: expected {}, got {}",
                self.vector_dimension,
                record.vector.len()
            )));
        }

        debug!("Upserting embedding {}", record.id);

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to open table: {}", e)))?;

        // Delete-then-add gives insert-or-replace semantics by id
        let predicate = format!("id = '{}'", record.id);
        table
            .delete(&predicate)
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to replace embedding: {}", e)))?;

        let record_batch = self.create_record_batch(&[record])?;
        let schema = record_batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to insert embedding: {}", e)))?;

        Ok(())
    }

    /// Create a RecordBatch from embedding records
    fn create_record_batch(&self, records: &[EmbeddingRecord]) -> Result<RecordBatch, DocvecError> {
        let len = records.len();
        let vector_dim = self.vector_dimension;

        let mut ids = Vec::with_capacity(len);
        let mut file_names = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);
        let mut flat_values = Vec::with_capacity(len * vector_dim);

        for record in records {
            ids.push(record.id.as_str());
            file_names.push(record.metadata.file_name.as_str());
            created_ats.push(record.metadata.created_at.as_str());
            flat_values.extend_from_slice(&record.vector);
        }

        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array =
            FixedSizeListArray::try_new(field, vector_dim as i32, Arc::new(values_array), None)
                .map_err(|e| {
                    DocvecError::VectorIndex(format!("Failed to create vector array: {}", e))
                })?;

        let arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(file_names)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(self.create_schema(), arrays)
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to create record batch: {}", e)))
    }

    /// Search for the nearest stored embeddings
    ///
    /// Results are ordered by ascending distance, i.e. descending similarity
    /// score.
    #[inline]
    pub async fn search_similar(
        &self,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<VectorMatch>, DocvecError> {
        debug!("Searching for similar vectors with limit: {}", limit);

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to open table: {}", e)))?;

        let results = table
            .vector_search(query_vector)
            .map_err(|e| {
                DocvecError::VectorIndex(format!("Failed to create vector search: {}", e))
            })?
            .column("vector")
            .limit(limit)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to execute search: {}", e)))?;

        self.parse_search_results_stream(results).await
    }

    async fn parse_search_results_stream(
        &self,
        mut results: lancedb::arrow::SendableRecordBatchStream,
    ) -> Result<Vec<VectorMatch>, DocvecError> {
        let mut matches = Vec::new();

        while let Some(batch) = results.try_next().await.map_err(|e| {
            DocvecError::VectorIndex(format!("Failed to read result stream: {}", e))
        })? {
            matches.extend(self.parse_search_batch(&batch)?);
        }

        debug!("Parsed {} search results from stream", matches.len());
        Ok(matches)
    }

    fn parse_search_batch(&self, batch: &RecordBatch) -> Result<Vec<VectorMatch>, DocvecError> {
        let num_rows = batch.num_rows();
        let mut matches = Vec::with_capacity(num_rows);

        let ids = Self::string_column(batch, "id")?;
        let file_names = Self::string_column(batch, "file_name")?;

        let distances = batch
            .column_by_name("_distance")
            .map(|col| col.as_any().downcast_ref::<Float32Array>());

        for row in 0..num_rows {
            let distance = distances
                .flatten()
                .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

            // Convert distance to similarity score (higher is better)
            matches.push(VectorMatch {
                vector_id: ids.value(row).to_string(),
                file_name: file_names.value(row).to_string(),
                similarity_score: 1.0 - distance,
                distance,
            });
        }

        Ok(matches)
    }

    fn string_column<'a>(
        batch: &'a RecordBatch,
        name: &str,
    ) -> Result<&'a StringArray, DocvecError> {
        batch
            .column_by_name(name)
            .ok_or_else(|| DocvecError::VectorIndex(format!("Missing {} column", name)))?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| DocvecError::VectorIndex(format!("Invalid {} column type", name)))
    }

    /// List the identifiers of every stored embedding
    #[inline]
    pub async fn list_ids(&self) -> Result<Vec<String>, DocvecError> {
        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to open table: {}", e)))?;

        let mut results = table
            .query()
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to scan table: {}", e)))?;

        let mut ids = Vec::new();
        while let Some(batch) = results.try_next().await.map_err(|e| {
            DocvecError::VectorIndex(format!("Failed to read result stream: {}", e))
        })? {
            let id_column = Self::string_column(&batch, "id")?;
            for row in 0..batch.num_rows() {
                ids.push(id_column.value(row).to_string());
            }
        }

        Ok(ids)
    }

    /// Fetch every stored embedding as `(id, vector)` pairs
    ///
    /// The whole population is materialized in memory; callers are expected
    /// to keep the index small.
    #[inline]
    pub async fn fetch_all(&self) -> Result<Vec<(String, Vec<f32>)>, DocvecError> {
        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to open table: {}", e)))?;

        let mut results = table
            .query()
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to scan table: {}", e)))?;

        let mut entries = Vec::new();
        while let Some(batch) = results.try_next().await.map_err(|e| {
            DocvecError::VectorIndex(format!("Failed to read result stream: {}", e))
        })? {
            let id_column = Self::string_column(&batch, "id")?;
            let vector_column = batch
                .column_by_name("vector")
                .ok_or_else(|| DocvecError::VectorIndex("Missing vector column".to_string()))?
                .as_any()
                .downcast_ref::<FixedSizeListArray>()
                .ok_or_else(|| {
                    DocvecError::VectorIndex("Invalid vector column type".to_string())
                })?;

            for row in 0..batch.num_rows() {
                let values = vector_column.value(row);
                let floats = values
                    .as_any()
                    .downcast_ref::<Float32Array>()
                    .ok_or_else(|| {
                        DocvecError::VectorIndex("Invalid vector element type".to_string())
                    })?;

                entries.push((id_column.value(row).to_string(), floats.values().to_vec()));
            }
        }

        debug!("Fetched {} embeddings from vector store", entries.len());
        Ok(entries)
    }

    /// Get the total number of embeddings stored
    #[inline]
    pub async fn count_embeddings(&self) -> Result<u64, DocvecError> {
        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to open table: {}", e)))?;

        let count = table
            .count_rows(None)
            .await
            .map_err(|e| DocvecError::VectorIndex(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }
}
