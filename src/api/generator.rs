//! Generator endpoint handlers

use axum::{body::Bytes, extract::State};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, GenerateRequest, Json, LoadVectorStoreResponse, ProcessPdfRequest,
    ProcessPdfResponse, QueryRequest, QueryResponse, RagStatusResponse, SaveVectorStoreResponse,
    ServiceInfoResponse, VectorStoreRequest, JSON_PARSE_ERROR,
};
use crate::domain::generation::GeneratedArtifact;

/// Kind of vector index served by this process
const VECTORSTORE_TYPE: &str = "exact_cosine";

/// GET /
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        ok: true,
        service: state.service_name.to_string(),
    })
}

/// POST /process-pdf
pub async fn process_pdf(
    State(state): State<AppState>,
    Json(request): Json<ProcessPdfRequest>,
) -> Result<Json<ProcessPdfResponse>, ApiError> {
    debug!(pdf_id = %request.pdf_id, "Processing document");

    let processed = state
        .content
        .process_document(&request.pdf_id, request.bucket_name.as_deref())
        .await?;

    Ok(Json(ProcessPdfResponse {
        success: true,
        chunks_created: processed.index.len(),
        text_length: processed.text_length,
        pages: processed.pages,
        message: "PDF processed and indexed successfully".to_string(),
    }))
}

/// POST /generate
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GeneratedArtifact>, ApiError> {
    debug!(
        content_type = request.content_type.as_deref().unwrap_or("assignment"),
        pdf_id = request.pdf_id.as_deref().unwrap_or(""),
        "Generating content"
    );

    let artifact = state.content.generate(request.into()).await?;
    Ok(Json(artifact))
}

/// POST /query
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let context = state
        .content
        .query(&request.query, request.top_k, request.pdf_id.as_deref())
        .await?;

    Ok(Json(QueryResponse {
        query: request.query,
        total_chunks: context.len(),
        context: context.context,
        chunks: context.chunks,
    }))
}

/// GET /rag-status
pub async fn rag_status(State(state): State<AppState>) -> Json<RagStatusResponse> {
    let content = &state.content;
    let active = content.registry().active().await;
    let chunking = content.indexing().chunking();

    Json(RagStatusResponse {
        indexed: active.is_some(),
        document_id: active.as_ref().map(|index| index.document_id().to_string()),
        chunks: active.as_ref().map_or(0, |index| index.len()),
        generation: active.as_ref().map_or(0, |index| index.generation()),
        mode: content.options().mode.as_str(),
        vectorstore_type: VECTORSTORE_TYPE,
        embedding_model: content.indexing().embedding_model().to_string(),
        reranker: content.retrieval().reranker_name().to_string(),
        chunk_size: chunking.chunk_size,
        chunk_overlap: chunking.chunk_overlap,
    })
}

/// POST /save-vectorstore
pub async fn save_vectorstore(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SaveVectorStoreResponse>, ApiError> {
    let request = optional_body(&body)?;

    let (path, index) = state
        .content
        .save_vector_store(request.path.as_deref(), request.pdf_id.as_deref())
        .await?;

    info!(path = %path, document_id = index.document_id(), "Vector store saved");
    Ok(Json(SaveVectorStoreResponse {
        success: true,
        path,
    }))
}

/// POST /load-vectorstore
pub async fn load_vectorstore(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoadVectorStoreResponse>, ApiError> {
    let request = optional_body(&body)?;

    let (path, index) = state
        .content
        .load_vector_store(request.path.as_deref())
        .await?;

    Ok(Json(LoadVectorStoreResponse {
        success: true,
        path,
        document_id: index.document_id().to_string(),
        chunks: index.len(),
    }))
}

/// Vector store endpoints accept an empty body
fn optional_body(body: &[u8]) -> Result<VectorStoreRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(VectorStoreRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        ApiError::bad_request(format!("Invalid JSON data: {}", e)).with_code(JSON_PARSE_ERROR)
    })
}
