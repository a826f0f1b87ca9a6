//! Observability infrastructure - tracing, logging and metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_generation_fallback, record_http_request,
    record_index_build, record_llm_request, record_rerank_fallback, LlmRequestMetricParams,
    PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
