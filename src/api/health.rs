//! Health check endpoints for liveness and readiness checks

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

/// Health response with per-component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub service: String,
    pub checks: Vec<HealthCheck>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Individual component health check
#[derive(Serialize, Clone, Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthCheck {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Healthy,
            message: None,
        }
    }

    pub fn degraded(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Degraded,
            message: Some(message.into()),
        }
    }
}

/// Overall status is degraded when any component is.
/// Always answers 200: missing credentials only fail the requests that need them.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = state.components.to_vec();

    checks.push(match state.content.registry().active().await {
        Some(index) => HealthCheck::healthy(format!("index:{}", index.document_id())),
        None => HealthCheck::degraded("index", "No document indexed yet"),
    });

    let status = if checks
        .iter()
        .filter(|c| c.name != "index")
        .all(|c| c.status == HealthStatus::Healthy)
    {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: state.service_name.to_string(),
        checks,
    };

    (StatusCode::OK, Json(response))
}

/// Liveness check - bare 200 while the process is up
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
    }

    #[test]
    fn test_health_check_serialization() {
        let json = serde_json::to_string(&HealthCheck::healthy("llm")).unwrap();
        assert!(!json.contains("message"));

        let json =
            serde_json::to_string(&HealthCheck::degraded("document_store", "SUPABASE_URL is not set"))
                .unwrap();
        assert!(json.contains("\"status\":\"degraded\""));
        assert!(json.contains("SUPABASE_URL is not set"));
    }
}
