//! Bounded-concurrency ingestion of multiple documents

use crate::ingest::IngestService;
use finsight_core::models::{DocumentMetadata, IngestionReport};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

/// One queued document: its intake metadata plus extracted text.
#[derive(Clone)]
pub struct IngestJob {
    pub metadata: DocumentMetadata,
    pub text: String,
}

/// Ingest jobs with at most `concurrency` documents in flight.
///
/// Failed jobs are logged and skipped; the successful reports come back in
/// completion order, not submission order.
pub async fn run_jobs(
    service: Arc<IngestService>,
    jobs: Vec<IngestJob>,
    concurrency: usize,
) -> Vec<IngestionReport> {
    let concurrency = concurrency.max(1);
    let sem = Arc::new(Semaphore::new(concurrency));

    stream::iter(jobs.into_iter().map(|job| {
        let service = service.clone();
        let sem = sem.clone();
        async move {
            let _permit = sem.acquire().await.ok()?;
            match service.ingest(&job.metadata, &job.text).await {
                Ok(report) => Some(report),
                Err(e) => {
                    error!(document_id = %job.metadata.document_id, "ingestion job failed: {e:#}");
                    None
                }
            }
        }
    }))
    .buffer_unordered(concurrency)
    .filter_map(|r| async move { r })
    .collect()
    .await
}
