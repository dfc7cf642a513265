//! Embedding providers
//!
//! Two backends: the OpenAI embeddings API (batched) and a local Ollama
//! server (one request per text). Both retry transient failures with
//! exponential backoff before surfacing `Error::Provider`.

use crate::traits::Embedder;
use crate::{Error, Result};
use async_trait::async_trait;
use finsight_config::{EmbeddingBackend, EmbeddingConfig};
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Pick an embedder from config, falling back to Ollama when the configured
/// OpenAI backend has no API key available.
pub fn select_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::OpenAi => {
            if env::var("OPENAI_API_KEY").is_ok() {
                Ok(Arc::new(OpenAiEmbedder::new(config)?))
            } else {
                warn!("OPENAI_API_KEY not set, falling back to Ollama embeddings");
                Ok(Arc::new(OllamaEmbedder::new(config)))
            }
        }
        EmbeddingBackend::Ollama => Ok(Arc::new(OllamaEmbedder::new(config))),
    }
}

fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(1u64 << attempt.min(16)))
}

fn is_transient(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingDatum {
    embedding: Vec<f32>,
}

/// OpenAI-compatible embeddings endpoint. Batches every request.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
    dimension: usize,
    max_retries: u32,
    retry_base_ms: u64,
}

impl OpenAiEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Configuration("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            api_url: "https://api.openai.com/v1/embeddings".to_string(),
            dimension: config.dimension,
            max_retries: config.max_retries,
            retry_base_ms: config.retry_base_ms,
        })
    }

    async fn request_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut attempt = 0u32;
        loop {
            let result = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "input": texts,
                    "model": self.model,
                }))
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: OpenAiEmbeddingResponse = response
                            .json()
                            .await
                            .map_err(|e| Error::Provider(format!("invalid response body: {e}")))?;
                        if body.data.len() != texts.len() {
                            return Err(Error::Provider(format!(
                                "embedding count mismatch: sent {} texts, got {} vectors",
                                texts.len(),
                                body.data.len()
                            )));
                        }
                        return Ok(body.data.into_iter().map(|d| d.embedding).collect());
                    }
                    if is_transient(status) && attempt < self.max_retries {
                        let delay = backoff_delay(self.retry_base_ms, attempt);
                        debug!(%status, attempt, delay_ms = delay.as_millis() as u64, "retrying embedding request");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Provider(format!(
                        "embeddings API returned {status}: {body}"
                    )));
                }
                Err(e) if attempt < self.max_retries => {
                    let delay = backoff_delay(self.retry_base_ms, attempt);
                    debug!(error = %e, attempt, "retrying embedding request after network error");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(Error::Provider(format!("embeddings request failed: {e}"))),
            }
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.request_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Provider("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_batch(texts).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

/// Local Ollama server. The embeddings endpoint takes one prompt at a time,
/// so batches degrade to a sequential loop.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    model: String,
    base_url: String,
    dimension: usize,
    max_retries: u32,
    retry_base_ms: u64,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        let base_url = env::var("OLLAMA_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());
        Self {
            client: reqwest::Client::new(),
            model: config.model.clone(),
            base_url,
            dimension: config.dimension,
            max_retries: config.max_retries,
            retry_base_ms: config.retry_base_ms,
        }
    }

    async fn request_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut attempt = 0u32;
        loop {
            let result = self
                .client
                .post(format!("{}/api/embeddings", self.base_url))
                .json(&json!({
                    "model": self.model,
                    "prompt": text,
                }))
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: OllamaEmbeddingResponse = response
                            .json()
                            .await
                            .map_err(|e| Error::Provider(format!("invalid Ollama response: {e}")))?;
                        return Ok(body.embedding);
                    }
                    if is_transient(status) && attempt < self.max_retries {
                        tokio::time::sleep(backoff_delay(self.retry_base_ms, attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Provider(format!(
                        "Ollama returned {status}: {body}"
                    )));
                }
                Err(e) if attempt < self.max_retries => {
                    tokio::time::sleep(backoff_delay(self.retry_base_ms, attempt)).await;
                    debug!(error = %e, attempt, "retrying Ollama embedding request");
                    attempt += 1;
                }
                Err(e) => return Err(Error::Provider(format!("Ollama request failed: {e}"))),
            }
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request_one(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.request_one(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
