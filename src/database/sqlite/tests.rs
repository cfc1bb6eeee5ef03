use super::*;
use anyhow::Result;
use tempfile::TempDir;

async fn create_test_database() -> Result<(TempDir, Database)> {
    let temp_dir = TempDir::new()?;
    let database = Database::new(temp_dir.path().join("test.db")).await?;
    Ok((temp_dir, database))
}

#[tokio::test]
async fn schema_migration() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(database.pool())
    .await?;

    assert!(tables.iter().any(|t| t == "documents"));

    Ok(())
}

#[tokio::test]
async fn migrations_are_idempotent() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    database.run_migrations().await?;
    database.run_migrations().await?;

    Ok(())
}

#[tokio::test]
async fn document_round_trip() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let new_document = NewDocument {
        id: "doc-1".to_string(),
        file_name: "report.txt".to_string(),
        content: "quarterly results".to_string(),
    };

    let created = database.insert_document(&new_document).await?;
    assert_eq!(created.id, "doc-1");
    assert_eq!(created.file_name, "report.txt");
    assert_eq!(created.content, "quarterly results");

    let fetched = database
        .get_document_by_id("doc-1")
        .await?
        .ok_or_else(|| anyhow::anyhow!("document should exist"))?;
    assert_eq!(fetched, created);

    assert_eq!(database.count_documents().await?, 1);
    assert_eq!(database.list_document_ids().await?, vec!["doc-1"]);

    Ok(())
}

#[tokio::test]
async fn missing_document_returns_none() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let result = database.get_document_by_id("no-such-id").await?;
    assert!(result.is_none());

    Ok(())
}

#[tokio::test]
async fn initialize_creates_data_dir() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = Config {
        storage: crate::config::StorageConfig {
            data_dir: temp_dir.path().join("nested").join("data"),
        },
        ..Default::default()
    };

    let database = Database::initialize_from_config(&config).await?;
    assert!(config.database_path().exists());
    assert_eq!(database.count_documents().await?, 0);

    Ok(())
}
