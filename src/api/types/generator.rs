//! Request and response bodies of the generator endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::retrieval::RetrievedChunk;
use crate::infrastructure::services::GenerateCommand;

/// GET /
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub ok: bool,
    pub service: String,
}

/// POST /process-pdf
#[derive(Debug, Deserialize)]
pub struct ProcessPdfRequest {
    pub pdf_id: String,
    #[serde(default)]
    pub bucket_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessPdfResponse {
    pub success: bool,
    pub chunks_created: usize,
    pub text_length: usize,
    pub pages: usize,
    pub message: String,
}

/// POST /generate
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub bloom_level: Option<String>,
    #[serde(default)]
    pub material_meta: Option<Value>,
    #[serde(default)]
    pub pdf_id: Option<String>,
    #[serde(default)]
    pub bucket_name: Option<String>,
    #[serde(default)]
    pub settings: Option<Value>,
}

impl From<GenerateRequest> for GenerateCommand {
    fn from(request: GenerateRequest) -> Self {
        Self {
            text: request.text,
            content_type: request.content_type,
            bloom_level: request.bloom_level,
            material_meta: request.material_meta,
            pdf_id: request.pdf_id,
            bucket_name: request.bucket_name,
            settings: request.settings,
        }
    }
}

/// POST /query
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub pdf_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub context: String,
    pub chunks: Vec<RetrievedChunk>,
    pub total_chunks: usize,
}

/// GET /rag-status
#[derive(Debug, Serialize)]
pub struct RagStatusResponse {
    pub indexed: bool,
    pub document_id: Option<String>,
    pub chunks: usize,
    pub generation: u64,
    pub mode: &'static str,
    pub vectorstore_type: &'static str,
    pub embedding_model: String,
    pub reranker: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// POST /save-vectorstore and /load-vectorstore; the body is optional
#[derive(Debug, Default, Deserialize)]
pub struct VectorStoreRequest {
    #[serde(default)]
    pub path: Option<String>,
    /// Document to save; the active one when absent
    #[serde(default)]
    pub pdf_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveVectorStoreResponse {
    pub success: bool,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct LoadVectorStoreResponse {
    pub success: bool,
    pub path: String,
    pub document_id: String,
    pub chunks: usize,
}
