//! Query-time retrieval

use finsight_core::models::{QueryRequest, RetrievalCandidate};
use finsight_core::traits::Embedder;
use finsight_core::{Error, Result};
use finsight_index::{MetadataFilter, VectorIndex};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub struct Retriever {
    index: Arc<RwLock<VectorIndex>>,
    embedder: Arc<dyn Embedder>,
    default_top_k: usize,
    max_top_k: usize,
}

impl Retriever {
    pub fn new(
        index: Arc<RwLock<VectorIndex>>,
        embedder: Arc<dyn Embedder>,
        default_top_k: usize,
        max_top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            default_top_k,
            max_top_k,
        }
    }

    /// Embed the query and return the top-k filtered candidates, best first.
    ///
    /// A request without `top_k` uses the configured default; explicit values
    /// are clamped to `1..=max_top_k`. No matches is `Error::NoResults` so
    /// callers can distinguish it from provider failures.
    pub async fn retrieve(&self, request: &QueryRequest) -> Result<Vec<RetrievalCandidate>> {
        let top_k = request
            .top_k
            .unwrap_or(self.default_top_k)
            .clamp(1, self.max_top_k);

        let query_vector = self.embedder.embed(&request.text).await?;

        let filter = MetadataFilter {
            ticker: request.company.clone(),
            doc_types: request
                .document_types
                .iter()
                .map(|t| t.to_string())
                .collect(),
            fiscal_year: None,
        };

        // Read lock: searches proceed concurrently and are only held out
        // while an ingestion holds the write side.
        let index = self.index.read().await;
        let candidates = index.search(&query_vector, top_k, &filter).await?;
        drop(index);

        debug!(
            top_k,
            returned = candidates.len(),
            filtered = !filter.is_empty(),
            "retrieval complete"
        );

        if candidates.is_empty() {
            return Err(Error::NoResults);
        }
        Ok(candidates)
    }
}
