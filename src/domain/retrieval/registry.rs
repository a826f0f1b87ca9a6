//! Versioned snapshot store for vector indexes

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::info;

use super::VectorIndex;

#[derive(Debug, Default)]
struct RegistryState {
    indexes: HashMap<String, Arc<VectorIndex>>,
    active: Option<String>,
}

/// Holds one immutable index snapshot per document.
///
/// Publishing replaces the snapshot for a document in a single write-locked swap; readers
/// clone the `Arc` and keep using the snapshot they got even if a newer one is published.
/// The most recently published document is the active one.
#[derive(Debug, Default)]
pub struct IndexRegistry {
    state: RwLock<RegistryState>,
    generation: AtomicU64,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a freshly built index, returning the stored snapshot
    pub async fn publish(&self, index: VectorIndex) -> Arc<VectorIndex> {
        let document_id = index.document_id().to_string();

        // Generations are handed out under the write lock so commit order matches them
        let (generation, snapshot) = {
            let mut state = self.state.write().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let snapshot = Arc::new(index.with_generation(generation));
            state.indexes.insert(document_id.clone(), snapshot.clone());
            state.active = Some(document_id.clone());
            (generation, snapshot)
        };

        info!(
            document_id = %document_id,
            generation = generation,
            chunks = snapshot.len(),
            "Published index snapshot"
        );

        snapshot
    }

    /// Snapshot for a specific document
    pub async fn get(&self, document_id: &str) -> Option<Arc<VectorIndex>> {
        self.state.read().await.indexes.get(document_id).cloned()
    }

    /// Snapshot of the most recently published document
    pub async fn active(&self) -> Option<Arc<VectorIndex>> {
        let state = self.state.read().await;
        state
            .active
            .as_ref()
            .and_then(|id| state.indexes.get(id))
            .cloned()
    }

    /// Named document's snapshot when an id is given, the active snapshot otherwise
    pub async fn resolve(&self, document_id: Option<&str>) -> Option<Arc<VectorIndex>> {
        match document_id {
            Some(id) => self.get(id).await,
            None => self.active().await,
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.indexes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Latest generation number handed out (0 when nothing was ever published)
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
