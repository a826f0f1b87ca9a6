//! Learnify Generator
//!
//! Turns course material stored in object storage into quizzes, assignments and summaries:
//! - PDF download and page-aware text extraction
//! - Chunking, embedding and an in-memory vector index with optional reranking
//! - Prompt construction with Bloom's taxonomy guidance and structured LLM output
//! - Deterministic fallback artifacts when the language model misbehaves

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::health::HealthCheck;
use api::state::AppState;
use config::StorageConfig;
use domain::document::DocumentStore;
use domain::{EmbeddingProvider, IndexRegistry, Reranker};
use infrastructure::embedding::{OpenAiEmbeddingProvider, UnconfiguredEmbeddingProvider};
use infrastructure::extraction::PdfTextExtractor;
use infrastructure::ingestion::ChunkerFactory;
use infrastructure::llm::{HttpClient, LlmProviderFactory};
use infrastructure::object_store::{SupabaseDocumentStore, UnconfiguredDocumentStore};
use infrastructure::rerank::CohereReranker;
use infrastructure::services::{
    ContentOptions, ContentService, DocumentService, EmbeddingSettings, GenerationDefaults,
    GenerationService, IndexingService, RetrievalService,
};
use infrastructure::vector_store::FileVectorStore;
use tracing::{info, warn};

/// Wire every service from configuration. Missing credentials never abort startup; the
/// affected component reports itself degraded and fails on first use.
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let timeout = Duration::from_secs(config.http.timeout_secs);
    let http_client = HttpClient::with_timeout(timeout)?;
    let mut components = Vec::new();

    let llm = LlmProviderFactory::create(&config.llm, http_client.clone());
    components.push(match config.llm.api_key() {
        Some(_) => HealthCheck::healthy("llm"),
        None => HealthCheck::degraded("llm", format!("{} is not set", config.llm.api_key_env())),
    });

    let embedder = create_embedding_provider(config, http_client.clone());
    components.push(match embedder.provider_name() {
        "unconfigured" => HealthCheck::degraded("embedding", "EMBEDDING_API_KEY is not set"),
        _ => HealthCheck::healthy("embedding"),
    });

    let reranker = create_reranker(config, http_client);
    components.push(match &reranker {
        Some(_) => HealthCheck::healthy("reranker"),
        None if config.rerank.enabled => {
            HealthCheck::degraded("reranker", "COHERE_API_KEY is not set; using similarity order")
        }
        None => HealthCheck::healthy("reranker"),
    });

    let store = create_document_store(&config.storage, timeout)?;
    components.push(match store.store_name() {
        "unconfigured" => {
            HealthCheck::degraded("document_store", "SUPABASE_URL or SUPABASE_KEY is not set")
        }
        _ => HealthCheck::healthy("document_store"),
    });

    let registry = Arc::new(IndexRegistry::new());
    let embedding = EmbeddingSettings::new(config.embedding.model.clone())
        .with_dimensions(config.embedding.dimensions)
        .with_batch_size(config.embedding.batch_size);

    let documents = DocumentService::new(
        store,
        Arc::new(PdfTextExtractor::new()),
        config.storage.default_bucket.clone(),
    );

    let indexing = IndexingService::new(
        ChunkerFactory::create(config.rag.chunking),
        config.rag.chunking_config(),
        embedder.clone(),
        embedding.clone(),
        registry.clone(),
    );

    let mut retrieval =
        RetrievalService::new(embedder, embedding).with_candidates(config.rerank.candidates);
    if let Some(reranker) = reranker {
        retrieval = retrieval.with_reranker(reranker);
    }

    let generation = GenerationService::new(
        llm,
        GenerationDefaults {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            service_name: config.server.service_name.clone(),
        },
    );

    let content = ContentService::new(
        Arc::new(documents),
        Arc::new(indexing),
        Arc::new(retrieval),
        Arc::new(generation),
        registry,
        FileVectorStore::new(&config.vector_store.base_dir),
        ContentOptions {
            mode: config.rag.mode,
            top_k: config.rerank.top_k,
            default_page_range: config.prompt.default_page_range.clone(),
            default_vector_store_path: config.vector_store.default_path.clone(),
        },
    );

    info!(
        mode = config.rag.mode.as_str(),
        model = %config.llm.model,
        chunking = ?config.rag.chunking,
        "Generator services initialized"
    );

    Ok(AppState::new(Arc::new(content), config.server.service_name.clone())
        .with_components(components))
}

fn create_embedding_provider(config: &AppConfig, client: HttpClient) -> Arc<dyn EmbeddingProvider> {
    match config.embedding.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(api_key) => {
            info!(model = %config.embedding.model, "Using OpenAI-compatible embeddings");
            Arc::new(OpenAiEmbeddingProvider::with_base_url(
                client,
                api_key,
                config.embedding.base_url.clone(),
            ))
        }
        None => {
            warn!("EMBEDDING_API_KEY is not set; documents cannot be indexed");
            Arc::new(UnconfiguredEmbeddingProvider)
        }
    }
}

fn create_reranker(config: &AppConfig, client: HttpClient) -> Option<Arc<dyn Reranker>> {
    if !config.rerank.enabled {
        info!("Reranking disabled");
        return None;
    }

    match config.rerank.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(api_key) => Some(Arc::new(CohereReranker::with_base_url(
            client,
            api_key,
            config.rerank.model.clone(),
            config.rerank.base_url.clone(),
        ))),
        None => {
            warn!("COHERE_API_KEY is not set; retrieval keeps similarity order");
            None
        }
    }
}

fn create_document_store(
    config: &StorageConfig,
    timeout: Duration,
) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let url = config.supabase_url.as_deref().filter(|u| !u.trim().is_empty());
    let key = config.supabase_key.as_deref().filter(|k| !k.trim().is_empty());

    match (url, key) {
        (Some(url), Some(key)) => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            info!(url = url, bucket = %config.default_bucket, "Using Supabase document store");
            Ok(Arc::new(SupabaseDocumentStore::new(client, url, key)))
        }
        _ => {
            warn!("SUPABASE_URL or SUPABASE_KEY is not set; PDF downloads will fail");
            Ok(Arc::new(UnconfiguredDocumentStore))
        }
    }
}
