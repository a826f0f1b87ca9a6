//! Directory-based persistence for vector index snapshots

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::domain::retrieval::VectorIndex;
use crate::domain::DomainError;

/// File holding the serialized snapshot inside a store directory
pub const INDEX_FILE: &str = "index.json";

/// Saves and loads `VectorIndex` snapshots below a base directory
#[derive(Debug, Clone)]
pub struct FileVectorStore {
    base_dir: PathBuf,
}

impl FileVectorStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a caller-supplied relative path below the base directory
    pub fn resolve(&self, path: &str) -> Result<PathBuf, DomainError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Vector store path must not be empty"));
        }

        let relative = Path::new(trimmed);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(DomainError::validation(format!(
                        "Vector store path '{}' must not contain '..'",
                        trimmed
                    )));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::validation(format!(
                        "Vector store path '{}' must be relative",
                        trimmed
                    )));
                }
            }
        }

        Ok(self.base_dir.join(relative))
    }

    /// Write the snapshot to `<base_dir>/<path>/index.json`, returning the directory
    pub async fn save(&self, index: &VectorIndex, path: &str) -> Result<PathBuf, DomainError> {
        let dir = self.resolve(path)?;

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let payload = serde_json::to_vec(index)
            .map_err(|e| DomainError::internal(format!("Failed to serialize index: {}", e)))?;

        let target = dir.join(INDEX_FILE);
        let tmp = dir.join(format!("{}.tmp", INDEX_FILE));

        tokio::fs::write(&tmp, &payload).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &target).await.map_err(|e| {
            DomainError::storage(format!("Failed to replace {}: {}", target.display(), e))
        })?;

        info!(
            path = %dir.display(),
            document_id = index.document_id(),
            chunks = index.len(),
            "Vector store saved"
        );

        Ok(dir)
    }

    /// Read the snapshot stored at `<base_dir>/<path>/index.json`
    pub async fn load(&self, path: &str) -> Result<VectorIndex, DomainError> {
        let dir = self.resolve(path)?;
        let target = dir.join(INDEX_FILE);

        let payload = match tokio::fs::read(&target).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DomainError::not_found(format!(
                    "Vector store '{}' does not exist",
                    path.trim()
                )));
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    target.display(),
                    e
                )));
            }
        };

        let stored: VectorIndex = serde_json::from_slice(&payload).map_err(|e| {
            DomainError::storage(format!("Corrupt vector store at {}: {}", target.display(), e))
        })?;

        // Re-run the build checks so a hand-edited file cannot yield a ragged index
        let (document_id, embedding_model, chunks, vectors) = stored.into_parts();
        let index = VectorIndex::build(document_id, embedding_model, chunks, vectors)
            .map_err(|e| DomainError::storage(format!("Invalid vector store: {}", e)))?;

        debug!(path = %dir.display(), chunks = index.len(), "Vector store loaded");
        Ok(index)
    }
}
