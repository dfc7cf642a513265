use crate::filter::MetadataFilter;
use arrow::array::{
    ArrayRef, Float32Array, Int32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use finsight_core::models::{CandidateMetadata, DocumentType, RetrievalCandidate};
use finsight_core::{Error, Result};
use futures::stream::TryStreamExt;
use lance::dataset::{Dataset, WriteMode, WriteParams};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One row to be written to the index
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk_id: String,
    pub document_id: String,
    pub ticker: String,
    pub doc_type: String,
    pub fiscal_year: Option<i32>,
    pub text: String,
    pub vector: Vec<f32>,
}

pub struct VectorIndex {
    dataset: Option<Dataset>,
    index_path: std::path::PathBuf,
    dimension: usize,
}

impl VectorIndex {
    pub async fn new(index_path: &Path, dimension: usize) -> Result<Self> {
        // An existing path that fails to open is corruption, not a fresh
        // index; silently recreating it would shadow the old data.
        let dataset = if index_path.exists() {
            let ds = Dataset::open(&index_path.to_string_lossy())
                .await
                .map_err(|e| {
                    Error::Index(format!(
                        "failed to open existing index at {}: {e}",
                        index_path.display()
                    ))
                })?;
            Some(ds)
        } else {
            None
        };

        Ok(Self {
            dataset,
            index_path: index_path.to_path_buf(),
            dimension,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("chunk_id", DataType::Utf8, false),
            Field::new("document_id", DataType::Utf8, false),
            Field::new("ticker", DataType::Utf8, false),
            Field::new("doc_type", DataType::Utf8, false),
            Field::new("fiscal_year", DataType::Int32, true),
            Field::new("text", DataType::Utf8, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    self.dimension as i32,
                ),
                false,
            ),
        ]))
    }

    /// Insert or replace entries. Existing rows with the same chunk ids are
    /// deleted first, so re-ingestion never leaves duplicates behind.
    pub async fn upsert(&mut self, entries: &[IndexEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        for entry in entries {
            if entry.vector.len() != self.dimension {
                return Err(Error::Configuration(format!(
                    "embedding dimension mismatch: index expects {}, got {} for chunk {}",
                    self.dimension,
                    entry.vector.len(),
                    entry.chunk_id
                )));
            }
        }

        let ids: Vec<String> = entries.iter().map(|e| e.chunk_id.clone()).collect();
        self.delete_chunks(&ids).await?;

        let schema = self.schema();

        let chunk_ids: ArrayRef = Arc::new(StringArray::from(
            entries.iter().map(|e| e.chunk_id.as_str()).collect::<Vec<_>>(),
        ));
        let document_ids: ArrayRef = Arc::new(StringArray::from(
            entries.iter().map(|e| e.document_id.as_str()).collect::<Vec<_>>(),
        ));
        let tickers: ArrayRef = Arc::new(StringArray::from(
            entries.iter().map(|e| e.ticker.as_str()).collect::<Vec<_>>(),
        ));
        let doc_types: ArrayRef = Arc::new(StringArray::from(
            entries.iter().map(|e| e.doc_type.as_str()).collect::<Vec<_>>(),
        ));
        let fiscal_years: ArrayRef = Arc::new(Int32Array::from(
            entries.iter().map(|e| e.fiscal_year).collect::<Vec<_>>(),
        ));
        let texts: ArrayRef = Arc::new(StringArray::from(
            entries.iter().map(|e| e.text.as_str()).collect::<Vec<_>>(),
        ));
        let embeddings: ArrayRef = {
            let values: Vec<f32> = entries.iter().flat_map(|e| e.vector.clone()).collect();
            let field = Arc::new(Field::new("item", DataType::Float32, true));
            Arc::new(arrow::array::FixedSizeListArray::new(
                field,
                self.dimension as i32,
                Arc::new(Float32Array::from(values)),
                None,
            ))
        };

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                chunk_ids,
                document_ids,
                tickers,
                doc_types,
                fiscal_years,
                texts,
                embeddings,
            ],
        )
        .map_err(|e| Error::Index(format!("failed to build record batch: {e}")))?;

        let write_mode = if self.dataset.is_some() {
            WriteMode::Append
        } else {
            WriteMode::Create
        };

        let reader = RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema);
        let dataset = Dataset::write(
            reader,
            &self.index_path.to_string_lossy(),
            Some(WriteParams {
                mode: write_mode,
                ..Default::default()
            }),
        )
        .await
        .map_err(|e| Error::Index(format!("write failed: {e}")))?;

        self.dataset = Some(dataset);
        debug!(rows = entries.len(), "wrote index entries");
        Ok(())
    }

    /// Nearest-neighbor search with an optional metadata prefilter.
    ///
    /// Scores are L2 distance mapped to `1 / (1 + distance)`, so higher is
    /// more similar. An index with no data returns an empty list.
    pub async fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<RetrievalCandidate>> {
        let dataset = match self.dataset.as_ref() {
            Some(ds) => ds,
            None => return Ok(Vec::new()),
        };

        if query_vector.len() != self.dimension {
            return Err(Error::Configuration(format!(
                "query embedding dimension mismatch: index expects {}, got {}",
                self.dimension,
                query_vector.len()
            )));
        }

        let query_array = Float32Array::from(query_vector.to_vec());

        let mut scanner = dataset.scan();
        scanner
            .nearest("embedding", &query_array, top_k)
            .map_err(|e| Error::Index(format!("nearest failed: {e}")))?;
        if let Some(predicate) = filter.to_predicate() {
            scanner
                .filter(&predicate)
                .map_err(|e| Error::Index(format!("bad filter predicate: {e}")))?;
            scanner.prefilter(true);
        }

        let stream = scanner
            .try_into_stream()
            .await
            .map_err(|e| Error::Index(format!("scan failed: {e}")))?;
        let batches: Vec<RecordBatch> = stream
            .try_collect()
            .await
            .map_err(|e| Error::Index(format!("scan stream failed: {e}")))?;

        let mut candidates = Vec::new();
        for batch in batches {
            let chunk_ids = string_column(&batch, "chunk_id")?;
            let document_ids = string_column(&batch, "document_id")?;
            let tickers = string_column(&batch, "ticker")?;
            let doc_types = string_column(&batch, "doc_type")?;
            let texts = string_column(&batch, "text")?;
            let fiscal_years = batch
                .column_by_name("fiscal_year")
                .and_then(|col| col.as_any().downcast_ref::<Int32Array>())
                .ok_or_else(|| Error::Index("missing fiscal_year column".to_string()))?;
            let distances = batch
                .column_by_name("_distance")
                .and_then(|col| col.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| Error::Index("missing _distance column".to_string()))?;

            for i in 0..batch.num_rows() {
                let distance = distances.value(i);
                candidates.push(RetrievalCandidate {
                    chunk_id: chunk_ids.value(i).to_string(),
                    text: texts.value(i).to_string(),
                    score: 1.0 / (1.0 + distance),
                    metadata: CandidateMetadata {
                        document_id: document_ids.value(i).to_string(),
                        ticker: tickers.value(i).to_string(),
                        doc_type: DocumentType::from_name(doc_types.value(i)),
                        fiscal_year: if fiscal_years.is_null(i) {
                            None
                        } else {
                            Some(fiscal_years.value(i))
                        },
                    },
                });
            }
        }

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(top_k);
        Ok(candidates)
    }

    pub async fn delete_chunks(&mut self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let dataset = match self.dataset.as_mut() {
            Some(ds) => ds,
            None => return Ok(()),
        };

        let parts: Vec<String> = ids
            .iter()
            .map(|id| format!("'{}'", id.replace('\'', "''")))
            .collect();
        let predicate = format!("chunk_id IN ({})", parts.join(","));

        dataset
            .delete(&predicate)
            .await
            .map_err(|e| Error::Index(format!("delete failed: {e}")))?;
        Ok(())
    }

    /// Remove every row belonging to one document.
    pub async fn delete_document(&mut self, document_id: &str) -> Result<()> {
        let dataset = match self.dataset.as_mut() {
            Some(ds) => ds,
            None => return Ok(()),
        };

        let predicate = format!("document_id = '{}'", document_id.replace('\'', "''"));
        dataset
            .delete(&predicate)
            .await
            .map_err(|e| Error::Index(format!("delete failed: {e}")))?;
        Ok(())
    }

    /// Distinct document ids present in the index. Used by reconciliation to
    /// spot rows whose metadata record is gone.
    pub async fn document_ids(&self) -> Result<Vec<String>> {
        let dataset = match self.dataset.as_ref() {
            Some(ds) => ds,
            None => return Ok(Vec::new()),
        };

        let mut scanner = dataset.scan();
        scanner
            .project(&["document_id"])
            .map_err(|e| Error::Index(format!("projection failed: {e}")))?;
        let stream = scanner
            .try_into_stream()
            .await
            .map_err(|e| Error::Index(format!("scan failed: {e}")))?;
        let batches: Vec<RecordBatch> = stream
            .try_collect()
            .await
            .map_err(|e| Error::Index(format!("scan stream failed: {e}")))?;

        let mut ids = BTreeSet::new();
        for batch in batches {
            let column = string_column(&batch, "document_id")?;
            for i in 0..batch.num_rows() {
                ids.insert(column.value(i).to_string());
            }
        }
        Ok(ids.into_iter().collect())
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| Error::Index(format!("missing {name} column")))
}
