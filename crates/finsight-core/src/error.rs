//! Error taxonomy shared across the pipeline
//!
//! Transient provider errors are retried locally at the embedding and
//! generation boundaries; everything else propagates to the caller as a
//! typed error. The only deliberately swallowed condition is an
//! out-of-range citation marker, which is logged and discarded.

use crate::models::IngestionStage;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Embedding provider call failed after retries. Retryable by the user.
    #[error("provider call failed: {0}")]
    Provider(String),

    /// Retrieval matched nothing. Expected terminal state, not a failure;
    /// callers surface it as an insufficient-information answer.
    #[error("no documents matched the query filters")]
    NoResults,

    /// The language model call itself failed. Distinct from `NoResults` so
    /// callers can tell "nothing found" apart from "found context but could
    /// not answer".
    #[error("answer generation failed: {0}")]
    Generation(String),

    /// Fatal configuration fault (e.g. embedding dimension mismatch).
    /// Never retried; fails fast at startup or first use.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A stage of document ingestion failed. Recorded on the document's
    /// status record; re-ingestion is the recovery path.
    #[error("ingestion failed during {stage}: {reason}")]
    Ingestion {
        stage: IngestionStage,
        reason: String,
    },

    /// Query exceeded its configured deadline. The in-flight result is
    /// discarded, never delivered to a later request.
    #[error("query timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Metadata store failure
    #[error("metadata store error: {0}")]
    Store(String),

    /// Vector index failure
    #[error("vector index error: {0}")]
    Index(String),
}

impl Error {
    pub fn ingestion(stage: IngestionStage, reason: impl Into<String>) -> Self {
        Error::Ingestion {
            stage,
            reason: reason.into(),
        }
    }
}
