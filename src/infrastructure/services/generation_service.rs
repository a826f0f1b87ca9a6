//! Generation service - prompt, LLM call, parsing and fallback

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::generation::{
    extract_json_payload, fallback_artifact, json_schema, schema_name, ArtifactMetadata,
    ContentType, GeneratedArtifact, GenerationSettings, PromptBuilder, PromptInput,
};
use crate::domain::llm::{LlmProvider, LlmRequest, LlmResponse};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_generation_fallback, record_llm_request, LlmRequestMetricParams,
};

const SYSTEM_PROMPT: &str = "You are an educational content generator for teachers. \
Answer with one JSON object that follows the requested schema exactly, without commentary.";

/// Label for content grounded in retrieved chunks
pub const GENERATED_FROM_RAG: &str = "RAG-enhanced content";
/// Label for content grounded in the full document text
pub const GENERATED_FROM_FULL_TEXT: &str = "Full-text content";

/// Where the prompt source came from; echoed in the artifact metadata
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    pub generated_from: String,
    pub material_meta: Option<Value>,
    pub retrieved_chunks: usize,
    pub rag_enabled: bool,
    pub reranking: String,
}

/// Everything needed to produce one artifact
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub content_type: ContentType,
    pub query: String,
    /// Retrieved context or full document text; may be empty
    pub source: String,
    pub bloom_level: Option<String>,
    pub settings: GenerationSettings,
    pub provenance: Provenance,
}

/// A generated or placeholder artifact
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub artifact: GeneratedArtifact,
    pub fallback: bool,
}

/// LLM call parameters
#[derive(Debug, Clone)]
pub struct GenerationDefaults {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub service_name: String,
}

/// Produces quizzes, assignments and summaries with a single LLM call
pub struct GenerationService {
    llm: Arc<dyn LlmProvider>,
    defaults: GenerationDefaults,
    prompts: PromptBuilder,
}

impl std::fmt::Debug for GenerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationService")
            .field("provider", &self.llm.provider_name())
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// Why the model output was replaced
enum FallbackReason {
    Parse(String),
    Provider(String),
}

impl FallbackReason {
    fn label(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Provider(_) => "provider",
        }
    }

    fn into_message(self) -> String {
        match self {
            Self::Parse(message) | Self::Provider(message) => message,
        }
    }
}

impl GenerationService {
    pub fn new(llm: Arc<dyn LlmProvider>, defaults: GenerationDefaults) -> Self {
        Self {
            llm,
            defaults,
            prompts: PromptBuilder::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.defaults.model
    }

    pub fn provider_name(&self) -> &'static str {
        self.llm.provider_name()
    }

    /// Generate an artifact.
    ///
    /// Unparseable output and transient provider errors yield the placeholder artifact;
    /// fatal provider errors and missing credentials are returned.
    pub async fn generate(&self, input: &GenerationInput) -> Result<GenerationOutcome, DomainError> {
        let content_type = input.content_type;
        let bloom_level = input
            .settings
            .resolve_bloom_level(input.bloom_level.as_deref(), content_type);

        let prompt = self.prompts.build(&PromptInput {
            content_type,
            query: &input.query,
            source: &input.source,
            item_count: input.settings.num_questions,
            page_range: &input.settings.page_range,
            length: input.settings.length,
            bloom_level: &bloom_level,
        });

        let request = self.request(content_type, prompt);
        debug!(
            content_type = content_type.as_str(),
            provider = self.llm.provider_name(),
            model = %self.defaults.model,
            source_length = input.source.len(),
            "Sending generation request"
        );

        let start = Instant::now();
        let result = self.llm.chat(&self.defaults.model, request).await;
        self.record_request(content_type, start, &result);

        let (artifact, reason, model) = match result {
            Ok(response) => {
                let payload = extract_json_payload(response.content());
                match GeneratedArtifact::parse(content_type, payload) {
                    Ok(artifact) => (artifact, None, response.model),
                    Err(e) => {
                        warn!(
                            content_type = content_type.as_str(),
                            error = %e,
                            "Model output did not match the artifact schema"
                        );
                        (
                            fallback_artifact(content_type, &input.query, &bloom_level, &input.settings),
                            Some(FallbackReason::Parse(format!("Failed to parse model output: {}", e))),
                            response.model,
                        )
                    }
                }
            }
            Err(e) if e.is_fatal() => {
                error!(
                    content_type = content_type.as_str(),
                    provider = self.llm.provider_name(),
                    error = %e,
                    "Generation failed"
                );
                return Err(e);
            }
            Err(e) => {
                warn!(
                    content_type = content_type.as_str(),
                    provider = self.llm.provider_name(),
                    error = %e,
                    "Generation request failed, using fallback"
                );
                (
                    fallback_artifact(content_type, &input.query, &bloom_level, &input.settings),
                    Some(FallbackReason::Provider(e.to_string())),
                    self.defaults.model.clone(),
                )
            }
        };

        let fallback = reason.is_some();
        if let Some(reason) = &reason {
            record_generation_fallback(content_type.as_str(), reason.label());
        }

        let mut artifact = artifact;
        let metadata = self.metadata(
            input,
            &artifact,
            bloom_level,
            reason.map(FallbackReason::into_message),
            model,
        );
        artifact.set_metadata(metadata);

        info!(
            content_type = content_type.as_str(),
            fallback = fallback,
            items = artifact.item_count().unwrap_or(0),
            "Artifact generated"
        );

        Ok(GenerationOutcome { artifact, fallback })
    }

    fn request(&self, content_type: ContentType, prompt: String) -> LlmRequest {
        let builder = LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .user(prompt)
            .temperature(self.defaults.temperature)
            .json_schema(schema_name(content_type), json_schema(content_type));

        match self.defaults.max_tokens {
            Some(max_tokens) => builder.max_tokens(max_tokens),
            None => builder,
        }
        .build()
    }

    fn record_request(
        &self,
        content_type: ContentType,
        start: Instant,
        result: &Result<LlmResponse, DomainError>,
    ) {
        let usage = result.as_ref().ok().and_then(|r| r.usage.as_ref());

        record_llm_request(LlmRequestMetricParams {
            provider: self.llm.provider_name(),
            model: &self.defaults.model,
            content_type: content_type.as_str(),
            duration: start.elapsed(),
            success: result.is_ok(),
            input_tokens: usage.map(|u| u64::from(u.prompt_tokens)),
            output_tokens: usage.map(|u| u64::from(u.completion_tokens)),
        });
    }

    fn metadata(
        &self,
        input: &GenerationInput,
        artifact: &GeneratedArtifact,
        bloom_level: String,
        error: Option<String>,
        model: String,
    ) -> ArtifactMetadata {
        let fallback = error.is_some();
        let provenance = &input.provenance;

        let generated_from = if fallback {
            format!("{} (fallback)", provenance.generated_from)
        } else {
            provenance.generated_from.clone()
        };

        let (total_questions, total_tasks, length) = match input.content_type {
            ContentType::Quiz => (artifact.item_count(), None, None),
            ContentType::Assignment => (None, artifact.item_count(), None),
            ContentType::Summary => (None, None, Some(input.settings.length.as_str().to_string())),
        };

        ArtifactMetadata {
            bloom_level,
            page_range: input.settings.page_range.clone(),
            generated_from,
            total_questions,
            total_tasks,
            length,
            error,
            fallback,
            source: self.defaults.service_name.clone(),
            material_meta: provenance.material_meta.clone(),
            retrieved_chunks: provenance.retrieved_chunks,
            rag_enabled: provenance.rag_enabled,
            reranking: provenance.reranking.clone(),
            model: Some(model),
            generated_at: Utc::now(),
        }
    }
}
