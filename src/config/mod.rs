//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CorsConfig, EmbeddingConfig, HttpConfig, LlmConfig, LlmProviderKind, LogFormat,
    LoggingConfig, PromptConfig, RagConfig, RerankConfig, ServerConfig, SourceMode,
    StorageConfig, VectorStoreConfig,
};
