use finsight_core::chunking::SentenceChunker;
use finsight_core::models::{
    DocumentMetadata, IngestionReport, IngestionStage, IngestionStatus,
};
use finsight_core::traits::Embedder;
use finsight_core::{Error, Result};
use finsight_index::{IndexEntry, VectorIndex};
use finsight_store::{ChunkStore, DocumentRecord, DocumentStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct IngestService {
    chunker: SentenceChunker,
    embedder: Arc<dyn Embedder>,
    index: Arc<RwLock<VectorIndex>>,
    documents: Arc<DocumentStore>,
    chunks: Arc<ChunkStore>,
    batch_size: usize,
}

impl IngestService {
    pub fn new(
        chunker: SentenceChunker,
        embedder: Arc<dyn Embedder>,
        index: Arc<RwLock<VectorIndex>>,
        documents: Arc<DocumentStore>,
        chunks: Arc<ChunkStore>,
        batch_size: usize,
    ) -> Self {
        Self {
            chunker,
            embedder,
            index,
            documents,
            chunks,
            batch_size: batch_size.max(1),
        }
    }

    /// Ingest one document's extracted text end to end.
    ///
    /// Safe to re-run: prior chunks and index rows for the document are
    /// removed before the new ones are written. Any stage failure records
    /// `Failed` with the reason and propagates the error.
    pub async fn ingest(&self, metadata: &DocumentMetadata, text: &str) -> Result<IngestionReport> {
        let id = &metadata.document_id;
        self.documents.put(&DocumentRecord::new(metadata))?;

        match self.run_stages(metadata, text).await {
            Ok(chunk_count) => {
                self.documents.set_chunk_count(id, chunk_count)?;
                self.documents.set_stage(id, IngestionStage::Completed, None)?;
                info!(document_id = %id, chunk_count, "ingestion complete");
                Ok(IngestionReport {
                    document_id: id.clone(),
                    chunk_count,
                    stage: IngestionStage::Completed,
                })
            }
            Err(e) => {
                warn!(document_id = %id, error = %e, "ingestion failed");
                // Best effort; the original error matters more than a
                // bookkeeping failure here.
                let _ = self
                    .documents
                    .set_stage(id, IngestionStage::Failed, Some(e.to_string()));
                Err(e)
            }
        }
    }

    async fn run_stages(&self, metadata: &DocumentMetadata, text: &str) -> Result<usize> {
        let id = &metadata.document_id;

        // Text arrives already extracted; the stage exists so status
        // reporting covers the whole lifecycle.
        self.documents.set_stage(id, IngestionStage::Extracting, None)?;

        self.documents.set_stage(id, IngestionStage::Chunking, None)?;
        self.clear_previous(id).await?;

        let mut chunks = self.chunker.chunk(id, text);
        if chunks.is_empty() {
            return Err(Error::ingestion(
                IngestionStage::Chunking,
                "document produced no chunks",
            ));
        }

        self.documents.set_stage(id, IngestionStage::Embedding, None)?;
        for batch in chunks.chunks_mut(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self
                .embedder
                .embed_batch(&texts)
                .await
                .map_err(|e| Error::ingestion(IngestionStage::Embedding, e.to_string()))?;
            if vectors.len() != batch.len() {
                return Err(Error::ingestion(
                    IngestionStage::Embedding,
                    format!("batch returned {} vectors for {} chunks", vectors.len(), batch.len()),
                ));
            }
            for (chunk, vector) in batch.iter_mut().zip(vectors) {
                chunk.embedding = Some(vector);
            }
        }

        self.documents.set_stage(id, IngestionStage::Storing, None)?;
        self.chunks
            .add_chunks(id, &chunks)
            .map_err(|e| Error::ingestion(IngestionStage::Storing, e.to_string()))?;

        let entries: Vec<IndexEntry> = chunks
            .iter()
            .filter_map(|chunk| {
                chunk.embedding.as_ref().map(|vector| IndexEntry {
                    chunk_id: chunk.id.clone(),
                    document_id: id.clone(),
                    ticker: metadata.ticker.clone(),
                    doc_type: metadata.doc_type.to_string(),
                    fiscal_year: metadata.fiscal_year,
                    text: chunk.text.clone(),
                    vector: vector.clone(),
                })
            })
            .collect();

        let mut index = self.index.write().await;
        index
            .upsert(&entries)
            .await
            .map_err(|e| Error::ingestion(IngestionStage::Storing, e.to_string()))?;

        Ok(chunks.len())
    }

    /// Drop all prior state for a document so re-ingestion starts clean.
    async fn clear_previous(&self, document_id: &str) -> Result<()> {
        let mut index = self.index.write().await;
        index.delete_document(document_id).await?;
        drop(index);
        self.chunks.delete_by_document(document_id)?;
        Ok(())
    }

    /// Delete a document entirely: record, chunks, and index rows.
    pub async fn delete(&self, document_id: &str) -> Result<()> {
        self.clear_previous(document_id).await?;
        self.documents.delete(document_id)?;
        info!(document_id, "document deleted");
        Ok(())
    }

    pub fn status(&self, document_id: &str) -> Result<Option<IngestionStatus>> {
        Ok(self.documents.get(document_id)?.map(|record| IngestionStatus {
            stage: record.stage,
            chunk_count: record.chunk_count,
            error: record.error,
        }))
    }
}
