//! Object store contract for raw documents

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Fetches raw document bytes by bucket and object identifier
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Download an object; a missing object yields `DomainError::NotFound`
    async fn download(&self, bucket: &str, object_id: &str) -> Result<Bytes, DomainError>;

    /// Get the store name
    fn store_name(&self) -> &'static str;
}
