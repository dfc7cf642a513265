//! Chat completion client for answer generation

use crate::traits::LanguageModel;
use crate::{Error, Result};
use async_trait::async_trait;
use finsight_config::LlmConfig;
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
///
/// Works against api.openai.com or any server exposing the same surface
/// (vLLM, Ollama's /v1 endpoint) via `llm.api_base`.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
    max_tokens: u32,
    max_retries: u32,
}

impl OpenAiChat {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Configuration("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
        })
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": self.max_tokens,
        });

        let mut attempt = 0u32;
        loop {
            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed: ChatResponse = response.json().await.map_err(|e| {
                            Error::Generation(format!("invalid completion response: {e}"))
                        })?;
                        let content = parsed
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.message.content)
                            .ok_or_else(|| {
                                Error::Generation("completion had no content".to_string())
                            })?;
                        return Ok(content);
                    }
                    let transient = status.as_u16() == 429 || status.is_server_error();
                    if transient && attempt < self.max_retries {
                        let delay = Duration::from_millis(500u64 << attempt.min(8));
                        debug!(%status, attempt, "retrying chat completion");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    let text = response.text().await.unwrap_or_default();
                    return Err(Error::Generation(format!(
                        "chat API returned {status}: {text}"
                    )));
                }
                Err(e) if attempt < self.max_retries => {
                    let delay = Duration::from_millis(500u64 << attempt.min(8));
                    debug!(error = %e, attempt, "retrying chat completion after network error");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(Error::Generation(format!("chat request failed: {e}"))),
            }
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.chat(system, user).await
    }
}
