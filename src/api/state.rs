//! Application state shared by the handlers

use std::sync::Arc;

use crate::infrastructure::services::ContentService;

use super::health::HealthCheck;

/// Cheap to clone; every handler gets its own copy
#[derive(Clone, Debug)]
pub struct AppState {
    pub content: Arc<ContentService>,
    pub service_name: Arc<str>,
    /// Credential status of the external collaborators, fixed at startup
    pub components: Arc<[HealthCheck]>,
}

impl AppState {
    pub fn new(content: Arc<ContentService>, service_name: impl Into<Arc<str>>) -> Self {
        Self {
            content,
            service_name: service_name.into(),
            components: Arc::from(Vec::new()),
        }
    }

    pub fn with_components(mut self, components: Vec<HealthCheck>) -> Self {
        self.components = components.into();
        self
    }
}
