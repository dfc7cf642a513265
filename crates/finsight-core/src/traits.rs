use crate::Result;
use async_trait::async_trait;

/// Converts text into a fixed-length vector.
///
/// The vector dimension and model identity are fixed configuration; every
/// implementation reports its dimension so the index can reject mismatched
/// vectors at write time.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch, preserving input order 1:1.
    ///
    /// A partial result (fewer vectors than inputs) must fail the whole
    /// batch; callers cannot safely recover per-item.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;
}

/// Chat-style language model used for answer generation
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
