use async_trait::async_trait;
use finsight_core::chunking::SentenceChunker;
use finsight_core::models::{DocumentMetadata, DocumentType, IngestionStage, QueryRequest};
use finsight_core::traits::{Embedder, LanguageModel};
use finsight_core::Result;
use finsight_engine::answer::INSUFFICIENT_CONTEXT_ANSWER;
use finsight_engine::{AnswerGenerator, IngestService, QueryService, Retriever};
use finsight_index::VectorIndex;
use finsight_store::{ChunkStore, DocumentStore, QueryLog};
use std::sync::Arc;
use tokio::sync::RwLock;

const DIM: usize = 8;

/// Deterministic embedder: histogram of byte values over 8 buckets,
/// L2-normalized. Similar texts land near each other, and the same text
/// always produces the same vector.
struct FakeEmbedder;

fn fake_vector(text: &str) -> Vec<f32> {
    let mut buckets = [0f32; DIM];
    for b in text.bytes() {
        buckets[(b as usize) % DIM] += 1.0;
    }
    let norm = buckets.iter().map(|v| v * v).sum::<f32>().sqrt().max(1e-6);
    buckets.iter().map(|v| v / norm).collect()
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(fake_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| fake_vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

struct FakeModel;

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok("Based on the filing, revenue grew 19% year over year [1].".to_string())
    }
}

struct Harness {
    ingest: Arc<IngestService>,
    query: QueryService,
    documents: Arc<DocumentStore>,
    chunks: Arc<ChunkStore>,
    index: Arc<RwLock<VectorIndex>>,
    _dir: tempfile::TempDir,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db = sled::open(dir.path().join("meta.db")).unwrap();
    let documents = Arc::new(DocumentStore::new(&db).unwrap());
    let chunks = Arc::new(ChunkStore::new(&db).unwrap());
    let query_log = Arc::new(QueryLog::new(&db).unwrap());

    let index = Arc::new(RwLock::new(
        VectorIndex::new(&dir.path().join("vectors.lance"), DIM)
            .await
            .unwrap(),
    ));

    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder);
    let chunker = SentenceChunker::with_counter(64, 8, |t| t.split_whitespace().count());

    let ingest = Arc::new(IngestService::new(
        chunker,
        embedder.clone(),
        index.clone(),
        documents.clone(),
        chunks.clone(),
        16,
    ));

    let retriever = Retriever::new(index.clone(), embedder, 5, 20);
    let generator = AnswerGenerator::new(Arc::new(FakeModel));
    let query = QueryService::new(retriever, generator, query_log, 30);

    Harness {
        ingest,
        query,
        documents,
        chunks,
        index,
        _dir: dir,
    }
}

fn metadata(id: &str, ticker: &str, doc_type: DocumentType) -> DocumentMetadata {
    DocumentMetadata {
        document_id: id.to_string(),
        ticker: ticker.to_string(),
        doc_type,
        fiscal_year: Some(2023),
        filing_date: None,
    }
}

const TSLA_TEXT: &str = "Tesla reported record vehicle deliveries this quarter. \
Automotive revenue grew substantially compared to the prior year. \
Energy storage deployments also reached a new high.";

const AAPL_TEXT: &str = "Apple services revenue set an all-time record. \
iPhone sales were roughly flat year over year. \
Gross margin expanded on a favorable product mix.";

#[tokio::test]
async fn ingest_completes_and_records_status() {
    let h = harness().await;
    let report = h
        .ingest
        .ingest(&metadata("tsla-10k", "TSLA", DocumentType::TenK), TSLA_TEXT)
        .await
        .unwrap();

    assert_eq!(report.stage, IngestionStage::Completed);
    assert!(report.chunk_count >= 1);

    let status = h.ingest.status("tsla-10k").unwrap().unwrap();
    assert_eq!(status.stage, IngestionStage::Completed);
    assert_eq!(status.chunk_count, report.chunk_count);
    assert!(status.error.is_none());

    let stored = h.chunks.chunks_for_document("tsla-10k").unwrap();
    assert_eq!(stored.len(), report.chunk_count);
}

#[tokio::test]
async fn reingestion_is_idempotent() {
    let h = harness().await;
    let meta = metadata("tsla-10k", "TSLA", DocumentType::TenK);

    let first = h.ingest.ingest(&meta, TSLA_TEXT).await.unwrap();
    let second = h.ingest.ingest(&meta, TSLA_TEXT).await.unwrap();
    assert_eq!(first.chunk_count, second.chunk_count);

    // No duplicate chunks survive the second pass.
    let stored = h.chunks.chunks_for_document("tsla-10k").unwrap();
    assert_eq!(stored.len(), second.chunk_count);

    let request = QueryRequest::new("vehicle deliveries revenue");
    let result = h.query.submit_query(&request).await.unwrap();
    assert!(!result.answer.is_empty());
}

#[tokio::test]
async fn ticker_filter_restricts_results() {
    let h = harness().await;
    h.ingest
        .ingest(&metadata("tsla-10k", "TSLA", DocumentType::TenK), TSLA_TEXT)
        .await
        .unwrap();
    h.ingest
        .ingest(&metadata("aapl-10k", "AAPL", DocumentType::TenK), AAPL_TEXT)
        .await
        .unwrap();

    let mut request = QueryRequest::new("revenue growth");
    request.company = Some("AAPL".to_string());
    let result = h.query.submit_query(&request).await.unwrap();

    assert_eq!(result.citations.len(), 1);
    let cited = h.chunks.get(&result.citations[0].chunk_id).unwrap().unwrap();
    assert_eq!(cited.document_id, "aapl-10k");
}

#[tokio::test]
async fn no_match_yields_insufficient_answer() {
    let h = harness().await;
    h.ingest
        .ingest(&metadata("tsla-10k", "TSLA", DocumentType::TenK), TSLA_TEXT)
        .await
        .unwrap();

    // Filter excludes everything that was ingested.
    let mut request = QueryRequest::new("revenue");
    request.company = Some("MSFT".to_string());
    let result = h.query.submit_query(&request).await.unwrap();

    assert_eq!(result.answer, INSUFFICIENT_CONTEXT_ANSWER);
    assert!(result.citations.is_empty());
}

#[tokio::test]
async fn answer_carries_resolved_citation() {
    let h = harness().await;
    h.ingest
        .ingest(&metadata("tsla-10k", "TSLA", DocumentType::TenK), TSLA_TEXT)
        .await
        .unwrap();

    let request = QueryRequest::new("deliveries");
    let result = h.query.submit_query(&request).await.unwrap();

    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.citations[0].position, 1);
    assert!(!result.citations[0].excerpt.is_empty());
}

#[tokio::test]
async fn empty_document_fails_ingestion() {
    let h = harness().await;
    let err = h
        .ingest
        .ingest(&metadata("empty-doc", "TSLA", DocumentType::TenK), "   ")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        finsight_core::Error::Ingestion {
            stage: IngestionStage::Chunking,
            ..
        }
    ));

    let status = h.ingest.status("empty-doc").unwrap().unwrap();
    assert_eq!(status.stage, IngestionStage::Failed);
    assert!(status.error.is_some());
}

#[tokio::test]
async fn delete_removes_document_everywhere() {
    let h = harness().await;
    h.ingest
        .ingest(&metadata("tsla-10k", "TSLA", DocumentType::TenK), TSLA_TEXT)
        .await
        .unwrap();

    h.ingest.delete("tsla-10k").await.unwrap();

    assert!(h.documents.get("tsla-10k").unwrap().is_none());
    assert!(h.chunks.chunks_for_document("tsla-10k").unwrap().is_empty());

    let request = QueryRequest::new("vehicle deliveries");
    let result = h.query.submit_query(&request).await.unwrap();
    assert_eq!(result.answer, INSUFFICIENT_CONTEXT_ANSWER);
}

#[tokio::test]
async fn omitted_top_k_uses_configured_default() {
    let h = harness().await;
    h.ingest
        .ingest(&metadata("tsla-10k", "TSLA", DocumentType::TenK), TSLA_TEXT)
        .await
        .unwrap();
    h.ingest
        .ingest(&metadata("aapl-10k", "AAPL", DocumentType::TenK), AAPL_TEXT)
        .await
        .unwrap();

    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder);
    let retriever = Retriever::new(h.index.clone(), embedder, 1, 20);

    // Two documents are indexed; a default of 1 must cap the candidates.
    let request = QueryRequest::new("revenue");
    let candidates = retriever.retrieve(&request).await.unwrap();
    assert_eq!(candidates.len(), 1);

    // An explicit top_k overrides the default.
    let mut request = QueryRequest::new("revenue");
    request.top_k = Some(2);
    let candidates = retriever.retrieve(&request).await.unwrap();
    assert_eq!(candidates.len(), 2);
}

#[tokio::test]
async fn search_proceeds_while_index_is_read_elsewhere() {
    let h = harness().await;
    h.ingest
        .ingest(&metadata("tsla-10k", "TSLA", DocumentType::TenK), TSLA_TEXT)
        .await
        .unwrap();

    // Another reader holding the index must not block a query.
    let _reader = h.index.read().await;

    let request = QueryRequest::new("vehicle deliveries");
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        h.query.submit_query(&request),
    )
    .await
    .expect("query must not wait on a concurrent reader")
    .unwrap();
    assert!(!result.answer.is_empty());
}

#[tokio::test]
async fn reconcile_removes_orphaned_index_rows() {
    let h = harness().await;
    h.ingest
        .ingest(&metadata("tsla-10k", "TSLA", DocumentType::TenK), TSLA_TEXT)
        .await
        .unwrap();
    h.ingest
        .ingest(&metadata("aapl-10k", "AAPL", DocumentType::TenK), AAPL_TEXT)
        .await
        .unwrap();

    // Drop one metadata record behind the index's back.
    h.documents.delete("tsla-10k").unwrap();

    let removed = finsight_engine::reconcile::reconcile(h.index.clone(), h.documents.clone())
        .await
        .unwrap();
    assert_eq!(removed, vec!["tsla-10k"]);

    // Its chunks no longer come back for queries.
    let mut request = QueryRequest::new("vehicle deliveries");
    request.company = Some("TSLA".to_string());
    let result = h.query.submit_query(&request).await.unwrap();
    assert_eq!(result.answer, INSUFFICIENT_CONTEXT_ANSWER);
}

#[tokio::test]
async fn worker_pool_ingests_all_jobs() {
    use finsight_engine::ingest::{run_jobs, IngestJob};

    let h = harness().await;
    let jobs = vec![
        IngestJob {
            metadata: metadata("tsla-10k", "TSLA", DocumentType::TenK),
            text: TSLA_TEXT.to_string(),
        },
        IngestJob {
            metadata: metadata("aapl-10k", "AAPL", DocumentType::TenK),
            text: AAPL_TEXT.to_string(),
        },
    ];

    let reports = run_jobs(h.ingest.clone(), jobs, 2).await;
    assert_eq!(reports.len(), 2);

    let mut ids = h.documents.ids().unwrap();
    ids.sort();
    assert_eq!(ids, vec!["aapl-10k", "tsla-10k"]);
}
