
use super::models::{Document, NewDocument};
use anyhow::{Context, Result};
use sqlx::SqlitePool;

pub struct DocumentQueries;

impl DocumentQueries {
    #[inline]
    pub async fn create(pool: &SqlitePool, new_document: NewDocument) -> Result<Document> {
        sqlx::query("INSERT INTO documents (id, file_name, content) VALUES (?, ?, ?)")
            .bind(&new_document.id)
            .bind(&new_document.file_name)
            .bind(&new_document.content)
            .execute(pool)
            .await
            .context("Failed to create document")?;

        Self::get_by_id(pool, &new_document.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created document"))
    }

    #[inline]
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Document>> {
        let result = sqlx::query_as::<_, Document>(
            "SELECT id, file_name, content, created_at FROM documents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get document by id")?;

        Ok(result)
    }

    #[inline]
    pub async fn list_ids(pool: &SqlitePool) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM documents ORDER BY created_at")
            .fetch_all(pool)
            .await
            .context("Failed to list document ids")?;

        Ok(ids)
    }

    #[inline]
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents")
            .fetch_one(pool)
            .await
            .context("Failed to count documents")?;

        Ok(count)
    }
}
