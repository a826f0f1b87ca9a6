use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::domain::{DomainError, FatalKind};

/// Maps a non-success status and its body to a domain error
pub type StatusClassifier = fn(u16, &str) -> DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        self.post_json_classified(url, headers, body, error_for_status)
            .await
    }

    /// `post_json` with a provider-specific reading of error responses
    async fn post_json_classified(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
        classify: StatusClassifier,
    ) -> Result<serde_json::Value, DomainError>;

    async fn get_bytes(&self, url: &str, headers: Vec<(&str, &str)>) -> Result<Bytes, DomainError>;
}

/// Map a non-success upstream status to a domain error.
///
/// 401/402/403/429 are fatal, 404 is a missing resource, everything else is transient.
pub fn error_for_status(status: u16, body: &str) -> DomainError {
    let message = format!("HTTP {}: {}", status, body);

    if let Some(kind) = FatalKind::from_status(status) {
        return DomainError::provider_fatal("http", kind, message);
    }

    if status == 404 {
        return DomainError::not_found(message);
    }

    DomainError::provider("http", message)
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn check(
        response: reqwest::Response,
        classify: StatusClassifier,
    ) -> Result<reqwest::Response, DomainError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let error_body = response.text().await.unwrap_or_default();
        Err(classify(status, &error_body))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json_classified(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
        classify: StatusClassifier,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        Self::check(response, classify)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to parse response: {}", e)))
    }

    async fn get_bytes(&self, url: &str, headers: Vec<(&str, &str)>) -> Result<Bytes, DomainError> {
        let mut request = self.client.get(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        Self::check(response, error_for_status)
            .await?
            .bytes()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to read body: {}", e)))
    }
}
