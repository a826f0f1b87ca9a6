use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Extraction error: {message}")]
    Extraction { message: String },

    #[error("Index unavailable: {message}")]
    IndexUnavailable { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    /// Authentication, authorization, quota or rate-limit failure reported by an upstream
    /// provider. Never recovered locally.
    #[error("Provider rejected request: {provider} - {kind}: {message}")]
    ProviderFatal {
        provider: String,
        kind: FatalKind,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Class of an upstream failure that must reach the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    Authentication,
    Authorization,
    Quota,
    RateLimit,
}

impl FatalKind {
    /// Classify an upstream HTTP status code
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(Self::Authentication),
            402 => Some(Self::Quota),
            403 => Some(Self::Authorization),
            429 => Some(Self::RateLimit),
            _ => None,
        }
    }
}

impl std::fmt::Display for FatalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::Quota => write!(f, "quota"),
            Self::RateLimit => write!(f, "rate_limit"),
        }
    }
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn index_unavailable(message: impl Into<String>) -> Self {
        Self::IndexUnavailable {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn provider_fatal(
        provider: impl Into<String>,
        kind: FatalKind,
        message: impl Into<String>,
    ) -> Self {
        Self::ProviderFatal {
            provider: provider.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error must propagate to the caller instead of being replaced by a
    /// fallback result
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ProviderFatal { .. } | Self::Configuration { .. })
    }

    /// Re-tag a provider error with a more specific provider name
    pub fn with_provider(self, name: &str) -> Self {
        match self {
            Self::Provider { message, .. } => Self::provider(name, message),
            Self::ProviderFatal { kind, message, .. } => Self::provider_fatal(name, kind, message),
            other => other,
        }
    }
}
