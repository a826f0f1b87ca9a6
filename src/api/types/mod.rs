//! API request, response and error types

pub mod error;
pub mod generator;
pub mod json;

pub use error::{ApiError, ApiErrorResponse};
pub use generator::{
    GenerateRequest, LoadVectorStoreResponse, ProcessPdfRequest, ProcessPdfResponse,
    QueryRequest, QueryResponse, RagStatusResponse, SaveVectorStoreResponse,
    ServiceInfoResponse, VectorStoreRequest,
};
pub use json::{Json, JSON_PARSE_ERROR};
