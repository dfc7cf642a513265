//! Ingestion pipeline configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Documents ingested concurrently by the worker pool
    ///
    /// Kept small so ingestion load does not starve query serving.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl crate::validation::Validate for IngestConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("ingest.concurrency", self.concurrency, 0)?;
        if self.concurrency > 4 {
            return Err(ConfigError::validation(
                "ingest.concurrency",
                "must be at most 4 to keep query latency unaffected",
            ));
        }
        Ok(())
    }
}

fn default_concurrency() -> usize {
    2
}
