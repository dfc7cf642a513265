//! Configuration type definitions
//!
//! All configuration structures organized by concern. Each type is
//! self-contained with validation and sensible defaults.

pub mod chunking;
pub mod embedding;
pub mod ingest;
pub mod llm;
pub mod retrieval;
pub mod storage;

pub use chunking::ChunkingConfig;
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use ingest::IngestConfig;
pub use llm::LlmConfig;
pub use retrieval::RetrievalConfig;
pub use storage::StorageConfig;

use serde::{Deserialize, Serialize};

/// Main configuration struct aggregating all settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage paths (metadata store, vector index)
    #[serde(default)]
    pub storage: StorageConfig,

    /// Document chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval behavior
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Ingestion pipeline settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Language model settings
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    /// Load from the default location (`.finsight.{yml,yaml,toml,json}` in
    /// the working directory), falling back to defaults when no file exists.
    pub fn load() -> crate::Result<Self> {
        crate::loader::load_default()
    }

    /// Load from a specific file, with environment overrides applied.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let mut config = crate::loader::load_from_file(path)?;
        crate::loader::apply_env_overrides(&mut config)?;
        Ok(config)
    }
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()?;
        self.chunking.validate()?;
        self.embedding.validate()?;
        self.retrieval.validate()?;
        self.ingest.validate()?;
        self.llm.validate()?;
        Ok(())
    }
}
