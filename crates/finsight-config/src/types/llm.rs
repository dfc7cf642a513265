//! Language model configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum tokens to generate per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Retry attempts for transient provider errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
        }
    }
}

impl crate::validation::Validate for LlmConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        if self.model.is_empty() {
            return Err(ConfigError::validation("llm.model", "must not be empty"));
        }
        validate_positive("llm.timeout_secs", self.timeout_secs as usize, 0)?;
        validate_positive("llm.max_tokens", self.max_tokens as usize, 0)?;
        Ok(())
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_max_retries() -> u32 {
    3
}
