//! Supabase Storage document store

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::domain::document::DocumentStore;
use crate::domain::DomainError;

/// Downloads objects through Supabase Storage's REST API
#[derive(Debug, Clone)]
pub struct SupabaseDocumentStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseDocumentStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn object_url(&self, bucket: &str, object_id: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket.trim_matches('/'),
            object_id.trim_start_matches('/')
        )
    }
}

/// Error body returned by Supabase Storage
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageErrorBody {
    #[serde(default)]
    status_code: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl StorageErrorBody {
    /// Supabase reports missing objects as HTTP 400 with `statusCode: "404"`
    fn is_not_found(&self) -> bool {
        let code_404 = match &self.status_code {
            Some(serde_json::Value::String(s)) => s == "404",
            Some(serde_json::Value::Number(n)) => n.as_u64() == Some(404),
            _ => false,
        };

        code_404 || self.error.as_deref() == Some("not_found")
    }
}

#[async_trait]
impl DocumentStore for SupabaseDocumentStore {
    async fn download(&self, bucket: &str, object_id: &str) -> Result<Bytes, DomainError> {
        let url = self.object_url(bucket, object_id);
        debug!(bucket = bucket, object_id = object_id, "Downloading document");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| DomainError::provider("supabase", format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .bytes()
                .await
                .map_err(|e| DomainError::provider("supabase", format!("Failed to read body: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<StorageErrorBody> = serde_json::from_str(&body).ok();

        if status.as_u16() == 404 || parsed.as_ref().is_some_and(StorageErrorBody::is_not_found) {
            return Err(DomainError::not_found(format!(
                "Document '{}' not found in bucket '{}'",
                object_id, bucket
            )));
        }

        let detail = parsed
            .and_then(|p| p.message.or(p.error))
            .unwrap_or(body);

        Err(crate::infrastructure::llm::error_for_status(status.as_u16(), &detail)
            .with_provider("supabase"))
    }

    fn store_name(&self) -> &'static str {
        "supabase"
    }
}

/// Stand-in used when Supabase credentials are missing
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredDocumentStore;

#[async_trait]
impl DocumentStore for UnconfiguredDocumentStore {
    async fn download(&self, _bucket: &str, _object_id: &str) -> Result<Bytes, DomainError> {
        Err(DomainError::configuration(
            "SUPABASE_URL and SUPABASE_KEY must be set to load documents",
        ))
    }

    fn store_name(&self) -> &'static str {
        "unconfigured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store(server: &MockServer) -> SupabaseDocumentStore {
        SupabaseDocumentStore::new(reqwest::Client::new(), server.uri(), "service-key")
    }

    #[tokio::test]
    async fn test_download_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/v1/object/uploadFiles/notes/bio.pdf"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 body".to_vec()))
            .mount(&server)
            .await;

        let bytes = store(&server).await.download("uploadFiles", "notes/bio.pdf").await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4 body");
    }

    #[tokio::test]
    async fn test_download_missing_object_reported_as_400() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "statusCode": "404",
                "error": "not_found",
                "message": "Object not found"
            })))
            .mount(&server)
            .await;

        let err = store(&server).await.download("uploadFiles", "missing.pdf").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_download_plain_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = store(&server).await.download("b", "x").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_download_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = store(&server).await.download("b", "x").await.unwrap_err();
        assert!(matches!(err, DomainError::Provider { ref provider, .. } if provider == "supabase"));
    }

    #[tokio::test]
    async fn test_unconfigured_store() {
        let err = UnconfiguredDocumentStore.download("b", "x").await.unwrap_err();
        assert!(err.is_fatal());
    }
}
