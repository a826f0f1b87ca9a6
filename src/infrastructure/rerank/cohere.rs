//! Cohere rerank provider

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::retrieval::{RerankResult, Reranker};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.ai";

/// Cross-encoder reranking via Cohere's `/v1/rerank`
#[derive(Debug)]
pub struct CohereReranker<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> CohereReranker<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_COHERE_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn rerank_url(&self) -> String {
        format!("{}/v1/rerank", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> Reranker for CohereReranker<C> {
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>, DomainError> {
        if documents.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "model": self.model,
            "query": query,
            "documents": documents,
            "top_n": top_n.min(documents.len()),
            "return_documents": false,
        });

        let headers = vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self
            .client
            .post_json(&self.rerank_url(), headers, &body)
            .await
            .map_err(|e| e.with_provider("cohere"))?;

        let parsed: CohereRerankResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("cohere", format!("Failed to parse rerank response: {}", e))
        })?;

        let mut results: Vec<RerankResult> = parsed
            .results
            .into_iter()
            .filter(|r| r.index < documents.len())
            .map(|r| RerankResult {
                index: r.index,
                relevance_score: r.relevance_score,
            })
            .collect();

        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        results.truncate(top_n);

        Ok(results)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct CohereRerankResponse {
    results: Vec<CohereRerankResult>,
}

#[derive(Debug, Deserialize)]
struct CohereRerankResult {
    index: usize,
    relevance_score: f32,
}
