use super::*;

#[tokio::test]
async fn mock_embedding_is_deterministic() {
    let model = MockEmbedding::new(16);

    let v1 = model.encode("same text").await.expect("should encode");
    let v2 = model.encode("same text").await.expect("should encode");
    assert_eq!(v1, v2);

    let v3 = model.encode("different text").await.expect("should encode");
    assert_ne!(v1, v3);
}

#[tokio::test]
async fn mock_embedding_dimension_and_norm() {
    let model = MockEmbedding::new(32);

    let vector = model.encode("hello world").await.expect("should encode");
    assert_eq!(vector.len(), 32);
    assert_eq!(model.dimension(), 32);

    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5, "vectors should be unit length");
}

#[tokio::test]
async fn mock_embedding_is_always_ready() {
    let model = MockEmbedding::new(8);
    assert_eq!(model.state(), ModelState::Ready);
}

#[tokio::test]
async fn uninitialized_embedder_refuses_to_encode() {
    let config = Config::default();
    let embedder = Embedder::new(&config).expect("should build embedder");

    assert_eq!(embedder.state(), ModelState::Uninitialized);

    let result = embedder.encode("some text").await;
    assert!(matches!(result, Err(DocvecError::ModelUnavailable(_))));
}

#[tokio::test]
async fn embedder_reports_configured_dimension() {
    let config = Config::default();
    let embedder = Embedder::new(&config).expect("should build embedder");
    assert_eq!(embedder.dimension(), DEFAULT_EMBEDDING_DIMENSION as usize);
    assert_eq!(embedder.model(), "nomic-embed-text:latest");
}

#[test]
fn model_state_display_and_serialization() {
    assert_eq!(ModelState::Uninitialized.to_string(), "Uninitialized");
    assert_eq!(ModelState::Ready.to_string(), "Ready");
    assert_eq!(ModelState::Failed.to_string(), "Failed");

    assert_eq!(
        serde_json::to_string(&ModelState::Ready).expect("should serialize"),
        "\"ready\""
    );
    assert_eq!(
        serde_json::to_string(&ModelState::Failed).expect("should serialize"),
        "\"failed\""
    );
}

#[tokio::test]
async fn trait_object_dispatch() {
    let model: std::sync::Arc<dyn EmbeddingModel> = std::sync::Arc::new(MockEmbedding::new(8));

    let vector = model.encode("via trait object").await.expect("should encode");
    assert_eq!(vector.len(), 8);
}
