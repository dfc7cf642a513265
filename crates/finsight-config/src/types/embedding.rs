//! Embedding provider configuration

use serde::{Deserialize, Serialize};

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI-compatible HTTP API (requires `OPENAI_API_KEY`)
    OpenAi,
    /// Local Ollama server
    Ollama,
}

impl Default for EmbeddingBackend {
    fn default() -> Self {
        EmbeddingBackend::OpenAi
    }
}

/// Configuration for the embedding provider
///
/// Model identity and vector dimension are fixed configuration, never
/// inferred per call. Every entry in a single vector index must share the
/// same dimension; mixing dimensions is a fatal configuration fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name, e.g. "text-embedding-3-small" or "nomic-embed-text"
    #[serde(default = "default_model")]
    pub model: String,

    /// Fixed vector dimension produced by the model
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Chunks per embedding request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Retry attempts for transient provider errors (network, rate limit)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff, in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub retry_base_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model: default_model(),
            dimension: default_dimension(),
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            retry_base_ms: default_backoff_ms(),
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        if self.model.is_empty() {
            return Err(ConfigError::validation("embedding.model", "must not be empty"));
        }
        validate_positive("embedding.dimension", self.dimension, 0)?;
        validate_positive("embedding.batch_size", self.batch_size, 0)?;
        Ok(())
    }
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_dimension() -> usize {
    1536
}

fn default_batch_size() -> usize {
    64
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    500
}
