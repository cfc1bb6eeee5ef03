use super::*;

#[test]
fn embedding_record_structure() {
    let metadata = VectorMetadata {
        file_name: "report.txt".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    };

    let record = EmbeddingRecord {
        id: "embedding_123".to_string(),
        vector: vec![0.1, 0.2, 0.3],
        metadata,
    };

    assert_eq!(record.id, "embedding_123");
    assert_eq!(record.vector.len(), 3);
    assert_eq!(record.metadata.file_name, "report.txt");
}

#[test]
fn vector_metadata_serialization() {
    let metadata = VectorMetadata {
        file_name: "notes.json".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    };

    let json = serde_json::to_string(&metadata).expect("can serialize json");
    let deserialized: VectorMetadata = serde_json::from_str(&json).expect("can parse json");

    assert_eq!(metadata.file_name, deserialized.file_name);
    assert_eq!(metadata.created_at, deserialized.created_at);
}
