use serde::Deserialize;

use crate::domain::ingestion::{ChunkingConfig, ChunkingType};
use crate::infrastructure::observability::ObservabilityConfig;

/// Well-known environment variables honoured on top of the `APP__` layer
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("RELOAD", "server.reload"),
    ("SUPABASE_URL", "storage.supabase_url"),
    ("SUPABASE_KEY", "storage.supabase_key"),
    ("GEMINI_API_KEY", "llm.gemini_api_key"),
    ("OPENAI_API_KEY", "llm.openai_api_key"),
    ("COHERE_API_KEY", "rerank.api_key"),
    ("EMBEDDING_API_KEY", "embedding.api_key"),
];

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub observability: ObservabilityConfig,
    pub http: HttpConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub rerank: RerankConfig,
    pub storage: StorageConfig,
    pub rag: RagConfig,
    pub prompt: PromptConfig,
    pub vector_store: VectorStoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Accepted from `RELOAD` but has no effect
    pub reload: bool,
    /// Reported by `GET /` and in artifact metadata
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Outbound HTTP settings shared by every adapter
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `*` allows any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
}

impl LlmConfig {
    /// Credential for the selected provider, if set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.provider {
            LlmProviderKind::Gemini => self.gemini_api_key.as_deref(),
            LlmProviderKind::OpenAi => self.openai_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> Option<&str> {
        match self.provider {
            LlmProviderKind::Gemini => self.gemini_base_url.as_deref(),
            LlmProviderKind::OpenAi => self.openai_base_url.as_deref(),
        }
    }

    /// Name of the credential's environment variable, used in error messages
    pub fn api_key_env(&self) -> &'static str {
        match self.provider {
            LlmProviderKind::Gemini => "GEMINI_API_KEY",
            LlmProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// OpenAI-compatible embeddings endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub dimensions: Option<usize>,
    /// Maximum inputs per embeddings call
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    pub enabled: bool,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    /// Candidates taken from the similarity stage
    pub candidates: usize,
    /// Chunks kept after reranking
    pub top_k: usize,
}

/// Supabase object storage
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub default_bucket: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Chunk, embed, retrieve and rerank
    #[default]
    Rag,
    /// Put the whole extracted text into the prompt
    FullText,
}

impl SourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rag => "rag",
            Self::FullText => "full_text",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub mode: SourceMode,
    pub chunking: ChunkingType,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_size: usize,
}

impl RagConfig {
    pub fn chunking_config(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
            .with_min_chunk_size(self.min_chunk_size)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Page-range label used when a request does not give one
    pub default_page_range: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Directory that save/load paths are resolved against
    pub base_dir: String,
    pub default_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            reload: false,
            service_name: "learnify-generator".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            model: "gemini-1.5-pro".to_string(),
            temperature: 0.7,
            max_tokens: None,
            gemini_api_key: None,
            gemini_base_url: None,
            openai_api_key: None,
            openai_base_url: None,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-ai/nomic-embed-text-v1.5".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            dimensions: None,
            batch_size: 96,
        }
    }
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "rerank-english-v3.0".to_string(),
            api_key: None,
            base_url: "https://api.cohere.ai".to_string(),
            candidates: 10,
            top_k: 5,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            default_bucket: "uploadFiles".to_string(),
        }
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        let chunking = ChunkingConfig::default();
        Self {
            mode: SourceMode::default(),
            chunking: ChunkingType::default(),
            chunk_size: chunking.chunk_size,
            chunk_overlap: chunking.chunk_overlap,
            min_chunk_size: chunking.min_chunk_size,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            default_page_range: "all".to_string(),
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            base_dir: "data".to_string(),
            default_path: "vectorstore".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(&[])
    }

    /// Load with well-known environment variables, then `extra` (command-line flags) on top
    pub fn load_with(extra: &[(&str, String)]) -> Result<Self, config::ConfigError> {
        let mut overrides: Vec<(&str, String)> = ENV_OVERRIDES
            .iter()
            .filter_map(|(var, key)| {
                std::env::var(var)
                    .ok()
                    .filter(|v| !v.is_empty())
                    .map(|v| (*key, v))
            })
            .collect();
        overrides.extend(extra.iter().cloned());

        Self::load_with_overrides(&overrides)
    }

    /// Layered load with explicit key overrides applied last
    pub fn load_with_overrides(overrides: &[(&str, String)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        for (key, value) in overrides {
            builder = builder.set_override(*key, value.as_str())?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.http.timeout_secs, 300);
        assert_eq!(config.prompt.default_page_range, "all");
        assert_eq!(config.storage.default_bucket, "uploadFiles");
        assert_eq!(config.rerank.candidates, 10);
        assert_eq!(config.rerank.top_k, 5);
        assert_eq!(config.rag.chunk_size, 1000);
        assert_eq!(config.rag.chunk_overlap, 200);
        assert_eq!(config.rag.mode, SourceMode::Rag);
        assert!(config.llm.api_key().is_none());
    }

    #[test]
    fn test_overrides_apply() {
        let config = AppConfig::load_with_overrides(&[
            ("server.port", "9100".to_string()),
            ("server.reload", "true".to_string()),
            ("llm.gemini_api_key", "g-key".to_string()),
            ("rag.mode", "full_text".to_string()),
        ])
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert!(config.server.reload);
        assert_eq!(config.llm.api_key(), Some("g-key"));
        assert_eq!(config.rag.mode, SourceMode::FullText);
        assert_eq!(config.rag.chunk_size, 1000);
    }

    #[test]
    fn test_llm_key_follows_provider() {
        let mut llm = LlmConfig {
            gemini_api_key: Some("g".into()),
            openai_api_key: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(llm.api_key(), Some("g"));

        llm.provider = LlmProviderKind::OpenAi;
        assert!(llm.api_key().is_none());
        assert_eq!(llm.api_key_env(), "OPENAI_API_KEY");
    }
}
