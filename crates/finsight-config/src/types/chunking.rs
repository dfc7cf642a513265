//! Document chunking configuration

use serde::{Deserialize, Serialize};

/// Configuration for sentence-aligned chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum tokens per chunk
    ///
    /// Should stay well under the embedding model's token limit.
    /// Common values:
    /// - 512: safe for most embedding models
    /// - 1024: for larger context models
    #[serde(default = "default_chunk_size")]
    pub chunk_size_tokens: usize,

    /// Overlap budget between adjacent chunks, in tokens
    ///
    /// Trailing sentences of the previous chunk are carried forward as long
    /// as they fit inside this budget. Recommended: 10-20% of
    /// `chunk_size_tokens`.
    #[serde(default = "default_overlap")]
    pub overlap_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size_tokens: default_chunk_size(),
            overlap_tokens: default_overlap(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("chunking.chunk_size_tokens", self.chunk_size_tokens, 0)?;

        if self.overlap_tokens >= self.chunk_size_tokens {
            return Err(ConfigError::validation(
                "chunking.overlap_tokens",
                format!(
                    "must be smaller than chunk_size_tokens ({})",
                    self.chunk_size_tokens
                ),
            ));
        }

        Ok(())
    }
}

fn default_chunk_size() -> usize {
    512
}

fn default_overlap() -> usize {
    64
}
