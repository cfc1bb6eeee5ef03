use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{AppState, start_server};
use crate::config::Config;
use crate::database::lancedb::VectorStore;
use crate::database::sqlite::Database;
use crate::embeddings::{Embedder, EmbeddingModel, ModelState};
use crate::pipeline::ConsistencyValidator;

/// Start the HTTP service
#[inline]
pub async fn serve(config: Config) -> Result<()> {
    info!(
        "Starting docvec service (data directory: {})",
        config.storage.data_dir.display()
    );

    let database = Database::initialize_from_config(&config)
        .await
        .context("Failed to initialize document store")?;

    let vector_store = VectorStore::new(&config)
        .await
        .context("Failed to initialize vector store")?;

    let mut embedder = Embedder::new(&config).context("Failed to create embedder")?;
    embedder.initialize().await;
    match embedder.state() {
        ModelState::Ready => {
            info!("Embedding model {} is ready", embedder.model());
        }
        state => {
            warn!(
                "Embedding model {} is {}, ingestion and retrieval will fail until Ollama is reachable",
                embedder.model(),
                state
            );
            println!(
                "Warning: embedding model is not ready. /vectorize and /retrieve-similar will return errors until Ollama is available."
            );
        }
    }

    let state = AppState::new(database, vector_store, Arc::new(embedder));
    start_server(&config, state).await?;

    Ok(())
}

/// Show store counts and embedding model readiness
#[inline]
pub async fn show_status(config: Config) -> Result<()> {
    println!("📊 Docvec Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("🗄️  Document Store:");
    let database = match Database::initialize_from_config(&config).await {
        Ok(database) => {
            println!("   ✅ SQLite: Connected");
            match database.count_documents().await {
                Ok(count) => println!("   📄 Documents: {}", count),
                Err(e) => println!("   ⚠️  Documents: unavailable - {}", e),
            }
            Some(database)
        }
        Err(e) => {
            println!("   ❌ SQLite: Failed to connect - {}", e);
            None
        }
    };

    println!();
    println!("🔍 Vector Index:");
    let vector_store = match VectorStore::new(&config).await {
        Ok(store) => {
            println!("   ✅ LanceDB: Connected (dimension {})", store.dimension());
            match store.count_embeddings().await {
                Ok(count) => println!("   🧮 Vectors: {}", count),
                Err(e) => println!("   ⚠️  Vectors: unavailable - {}", e),
            }
            Some(store)
        }
        Err(e) => {
            println!("   ❌ LanceDB: Failed to connect - {}", e);
            None
        }
    };

    println!();
    println!("🤖 Embedding Model:");
    match Embedder::new(&config) {
        Ok(mut embedder) => {
            embedder.initialize().await;
            match embedder.state() {
                ModelState::Ready => {
                    println!(
                        "   ✅ Ollama: Connected ({}:{})",
                        config.ollama.host, config.ollama.port
                    );
                    println!("   📋 Model: {}", config.ollama.model);
                    println!("   🔢 Dimension: {}", config.ollama.embedding_dimension);
                }
                state => {
                    println!(
                        "   ❌ Ollama: {} ({}:{})",
                        state, config.ollama.host, config.ollama.port
                    );
                }
            }
        }
        Err(e) => {
            println!("   ❌ Ollama: Failed to create client - {}", e);
        }
    }

    if let (Some(database), Some(vector_store)) = (database, vector_store) {
        println!();
        println!("🔍 Store Consistency:");
        let validator = ConsistencyValidator::new(&database, &vector_store);
        match validator.validate().await {
            Ok(report) => {
                if report.is_consistent() {
                    println!("   ✅ {}", report.summary());
                } else {
                    println!("   ⚠️  {}", report.summary());
                }
            }
            Err(e) => {
                println!("   ❌ Failed to check consistency: {}", e);
            }
        }
    }

    println!();
    println!("💡 Next Steps:");
    println!("   • Use 'docvec serve' to start the HTTP service");
    println!("   • Use 'docvec audit' to inspect store consistency in detail");

    Ok(())
}

/// Run the cross-store consistency audit and print the full report
///
/// Returns whether the stores are consistent so the caller can set the
/// process exit code.
#[inline]
pub async fn run_audit(config: Config) -> Result<bool> {
    let database = Database::initialize_from_config(&config)
        .await
        .context("Failed to initialize document store")?;

    let vector_store = VectorStore::new(&config)
        .await
        .context("Failed to initialize vector store")?;

    let validator = ConsistencyValidator::new(&database, &vector_store);
    let report = validator.validate().await?;

    println!("📋 Consistency Audit");
    println!("{}", "=".repeat(50));
    println!("   📄 Documents in store: {}", report.stored_documents);
    println!("   🧮 Vectors in index: {}", report.indexed_vectors);

    if report.is_consistent() {
        println!("   ✅ {}", report.summary());
    } else {
        println!("   ⚠️  {}", report.summary());
        if !report.missing_in_index.is_empty() {
            println!("   🚫 Documents missing from the index:");
            for id in &report.missing_in_index {
                println!("      - {}", id);
            }
        }
        if !report.orphaned_in_index.is_empty() {
            println!("   👻 Vectors with no stored document:");
            for id in &report.orphaned_in_index {
                println!("      - {}", id);
            }
        }
    }

    Ok(report.is_consistent())
}
