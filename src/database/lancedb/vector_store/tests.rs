use crate::config::{OllamaConfig, StorageConfig};
use crate::database::lancedb::VectorMetadata;

use super::*;
use tempfile::TempDir;

fn create_test_config(dimension: u32) -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config {
        storage: StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
        },
        ollama: OllamaConfig {
            embedding_dimension: dimension,
            ..OllamaConfig::default()
        },
        ..Config::default()
    };
    (config, temp_dir)
}

fn create_test_record(id: &str, seed: f32) -> EmbeddingRecord {
    // 5-dimensional vector with a per-record offset so vectors differ
    let vector: Vec<f32> = (0..5).map(|i| seed + i as f32 * 0.01).collect();

    EmbeddingRecord {
        id: id.to_string(),
        vector,
        metadata: VectorMetadata {
            file_name: format!("{}.txt", id),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        },
    }
}

#[tokio::test]
async fn vector_store_initialization() {
    let (config, _temp_dir) = create_test_config(5);

    let store = VectorStore::new(&config)
        .await
        .expect("should initialize vector store");
    assert_eq!(store.dimension(), 5);

    // Reopening against the same directory picks up the existing table
    let reopened = VectorStore::new(&config)
        .await
        .expect("should reopen vector store");
    assert_eq!(reopened.dimension(), 5);
}

#[tokio::test]
async fn reopen_with_different_dimension_is_rejected() {
    let (config, temp_dir) = create_test_config(5);

    VectorStore::new(&config)
        .await
        .expect("should initialize vector store");

    let mut changed = config;
    changed.ollama.embedding_dimension = 8;
    let result = VectorStore::new(&changed).await;
    assert!(result.is_err());

    drop(temp_dir);
}

#[tokio::test]
async fn upsert_and_count() {
    let (config, _temp_dir) = create_test_config(5);
    let store = VectorStore::new(&config)
        .await
        .expect("should initialize vector store");

    assert_eq!(
        store
            .count_embeddings()
            .await
            .expect("should count embeddings"),
        0
    );

    for (i, id) in ["a", "b", "c"].iter().enumerate() {
        store
            .upsert_embedding(create_test_record(id, i as f32))
            .await
            .expect("should store embedding");
    }

    assert_eq!(
        store
            .count_embeddings()
            .await
            .expect("should count embeddings"),
        3
    );
}

#[tokio::test]
async fn upsert_replaces_existing_record() {
    let (config, _temp_dir) = create_test_config(5);
    let store = VectorStore::new(&config)
        .await
        .expect("should initialize vector store");

    store
        .upsert_embedding(create_test_record("a", 0.0))
        .await
        .expect("should store embedding");
    store
        .upsert_embedding(create_test_record("a", 5.0))
        .await
        .expect("should replace embedding");

    assert_eq!(
        store
            .count_embeddings()
            .await
            .expect("should count embeddings"),
        1
    );

    let entries = store.fetch_all().await.expect("should fetch embeddings");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "a");
    assert!((entries[0].1[0] - 5.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn wrong_dimension_is_rejected() {
    let (config, _temp_dir) = create_test_config(5);
    let store = VectorStore::new(&config)
        .await
        .expect("should initialize vector store");

    let record = EmbeddingRecord {
        id: "bad".to_string(),
        vector: vec![0.1, 0.2, 0.3],
        metadata: VectorMetadata {
            file_name: "bad.txt".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        },
    };

    assert!(store.upsert_embedding(record).await.is_err());
    assert_eq!(
        store
            .count_embeddings()
            .await
            .expect("should count embeddings"),
        0
    );
}

#[tokio::test]
async fn search_returns_ordered_results() {
    let (config, _temp_dir) = create_test_config(5);
    let store = VectorStore::new(&config)
        .await
        .expect("should initialize vector store");

    for (i, id) in ["a", "b", "c", "d"].iter().enumerate() {
        store
            .upsert_embedding(create_test_record(id, i as f32))
            .await
            .expect("should store embedding");
    }

    let query: Vec<f32> = (0..5).map(|i| i as f32 * 0.01).collect();
    let results = store
        .search_similar(&query, 3)
        .await
        .expect("should search");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].vector_id, "a");
    assert_eq!(results[0].file_name, "a.txt");
    for i in 1..results.len() {
        assert!(
            results[i - 1].similarity_score >= results[i].similarity_score,
            "results should be ordered by descending similarity"
        );
    }

    // Exact match has zero distance, i.e. similarity 1.0
    assert!(results[0].distance.abs() < 1e-5);
    assert!((results[0].similarity_score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn search_respects_limit() {
    let (config, _temp_dir) = create_test_config(5);
    let store = VectorStore::new(&config)
        .await
        .expect("should initialize vector store");

    for i in 0..10 {
        store
            .upsert_embedding(create_test_record(&format!("doc-{}", i), i as f32))
            .await
            .expect("should store embedding");
    }

    let query: Vec<f32> = vec![0.0; 5];
    let results = store
        .search_similar(&query, 4)
        .await
        .expect("should search");
    assert_eq!(results.len(), 4);
}

#[tokio::test]
async fn list_ids_and_fetch_all() {
    let (config, _temp_dir) = create_test_config(5);
    let store = VectorStore::new(&config)
        .await
        .expect("should initialize vector store");

    for (i, id) in ["x", "y", "z"].iter().enumerate() {
        store
            .upsert_embedding(create_test_record(id, i as f32))
            .await
            .expect("should store embedding");
    }

    let mut ids = store.list_ids().await.expect("should list ids");
    ids.sort();
    assert_eq!(ids, vec!["x", "y", "z"]);

    let entries = store.fetch_all().await.expect("should fetch embeddings");
    assert_eq!(entries.len(), 3);
    for (id, vector) in &entries {
        assert_eq!(vector.len(), 5);
        assert!(ids.contains(id));
    }
}

#[tokio::test]
async fn empty_store_operations() {
    let (config, _temp_dir) = create_test_config(5);
    let store = VectorStore::new(&config)
        .await
        .expect("should initialize vector store");

    assert_eq!(
        store
            .count_embeddings()
            .await
            .expect("should count embeddings"),
        0
    );
    assert!(store.list_ids().await.expect("should list ids").is_empty());
    assert!(
        store
            .fetch_all()
            .await
            .expect("should fetch embeddings")
            .is_empty()
    );

    let query: Vec<f32> = vec![0.0; 5];
    let results = store
        .search_similar(&query, 5)
        .await
        .expect("should search empty store");
    assert!(results.is_empty());
}
