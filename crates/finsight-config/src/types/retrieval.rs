//! Retrieval and query-time configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Candidates returned when the request does not specify `top_k`
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Upper bound on `top_k`; requests beyond this are clamped
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Whole-query deadline. A query exceeding it is abandoned; the result
    /// of any in-flight provider call is discarded.
    #[serde(default = "default_timeout")]
    pub query_timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            query_timeout_secs: default_timeout(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("retrieval.default_top_k", self.default_top_k, 0)?;
        validate_positive("retrieval.max_top_k", self.max_top_k, 0)?;
        if self.default_top_k > self.max_top_k {
            return Err(ConfigError::validation(
                "retrieval.default_top_k",
                format!("must not exceed max_top_k ({})", self.max_top_k),
            ));
        }
        validate_positive(
            "retrieval.query_timeout_secs",
            self.query_timeout_secs as usize,
            0,
        )?;
        Ok(())
    }
}

fn default_top_k() -> usize {
    5
}

fn default_max_top_k() -> usize {
    20
}

fn default_timeout() -> u64 {
    60
}
