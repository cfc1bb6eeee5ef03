// Route handler functions for all API endpoints
// Each handler validates its request body, runs the matching pipeline over
// the shared state, and wraps the outcome in the response envelope.

use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::embeddings::ModelState;
use crate::pipeline::clustering::{ClusterAnalyzer, DEFAULT_CLUSTERS};
use crate::pipeline::ingest::{DocumentIngestor, IngestReceipt};
use crate::pipeline::retrieval::{DEFAULT_TOP_K, RetrievedMatch, SimilarityRetriever};

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct VectorizeRequest {
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    pub query_text: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ClusterRequest {
    pub n_clusters: Option<usize>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_state: ModelState,
}

#[derive(Debug, Serialize)]
pub struct VectorizeResponse {
    pub status: String,
    pub data: IngestReceipt,
}

#[derive(Debug, Serialize)]
pub struct RetrieveResponse {
    pub status: String,
    pub results: Vec<MatchPayload>,
}

#[derive(Debug, Serialize)]
pub struct ClusterResponse {
    pub status: String,
    pub vector_clusters: HashMap<String, usize>,
}

/// One entry of the `results` array.
///
/// A joined match carries `file_name` and `original_document`; a match
/// whose document is gone from the store carries `error: "not found"`
/// instead, degrading only that single entry.
#[derive(Debug, Serialize)]
pub struct MatchPayload {
    pub vector_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_document: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RetrievedMatch> for MatchPayload {
    #[inline]
    fn from(retrieved: RetrievedMatch) -> Self {
        match retrieved.document {
            Some(document) => Self {
                vector_id: retrieved.vector_id,
                file_name: Some(document.file_name),
                score: retrieved.score,
                original_document: Some(document_payload(document.content)),
                error: None,
            },
            None => Self {
                vector_id: retrieved.vector_id,
                file_name: None,
                score: retrieved.score,
                original_document: None,
                error: Some("not found".to_string()),
            },
        }
    }
}

/// Stored JSON documents come back as structured JSON; everything else is
/// returned as the stored text.
fn document_payload(content: String) -> serde_json::Value {
    serde_json::from_str(&content).unwrap_or_else(|_| serde_json::Value::String(content))
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health - process liveness plus embedder readiness.
#[inline]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_state: state.embedder.state(),
    })
}

/// POST /vectorize - ingest a document by file path.
#[inline]
pub async fn vectorize(
    State(state): State<AppState>,
    Json(body): Json<VectorizeRequest>,
) -> Result<Json<VectorizeResponse>, ApiError> {
    if body.file_path.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "'file_path' must not be empty".to_string(),
        ));
    }

    let ingestor = DocumentIngestor::new(
        &state.database,
        &state.vector_store,
        state.embedder.as_ref(),
    );
    let receipt = ingestor.ingest(&body.file_path).await?;

    Ok(Json(VectorizeResponse {
        status: "success".to_string(),
        data: receipt,
    }))
}

/// POST /retrieve-similar - top-K similarity query with document join-back.
#[inline]
pub async fn retrieve_similar(
    State(state): State<AppState>,
    Json(body): Json<RetrieveRequest>,
) -> Result<Json<RetrieveResponse>, ApiError> {
    let top_k = body.top_k.unwrap_or(DEFAULT_TOP_K);
    if top_k == 0 {
        return Err(ApiError::BadRequest(
            "'top_k' must be at least 1".to_string(),
        ));
    }

    let retriever = SimilarityRetriever::new(
        &state.database,
        &state.vector_store,
        state.embedder.as_ref(),
    );
    let matches = retriever.retrieve(&body.query_text, top_k).await?;
    let results = matches.into_iter().map(MatchPayload::from).collect();

    Ok(Json(RetrieveResponse {
        status: "success".to_string(),
        results,
    }))
}

/// POST /cluster-documents - seeded k-means over the full vector population.
#[inline]
pub async fn cluster_documents(
    State(state): State<AppState>,
    Json(body): Json<ClusterRequest>,
) -> Result<Json<ClusterResponse>, ApiError> {
    let n_clusters = body.n_clusters.unwrap_or(DEFAULT_CLUSTERS);
    if n_clusters == 0 {
        return Err(ApiError::BadRequest(
            "'n_clusters' must be at least 1".to_string(),
        ));
    }

    let analyzer = ClusterAnalyzer::new(&state.vector_store);
    let vector_clusters = analyzer.cluster_documents(n_clusters).await?;

    Ok(Json(ClusterResponse {
        status: "success".to_string(),
        vector_clusters,
    }))
}
