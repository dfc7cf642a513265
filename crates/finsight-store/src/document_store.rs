//! Document lifecycle records
//!
//! One record per ingested document, keyed by document id. The record
//! carries the intake metadata plus the current ingestion stage, so status
//! queries never touch the vector index.

use crate::store_err;
use finsight_core::models::{DocumentMetadata, IngestionStage};
use finsight_core::Result;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub ticker: String,
    pub doc_type: String,
    pub fiscal_year: Option<i32>,
    pub filing_date: Option<String>,
    pub stage: IngestionStage,
    pub chunk_count: usize,
    /// Failure reason when stage is `Failed`
    pub error: Option<String>,
    /// Unix seconds of the last stage transition
    pub updated_at: u64,
}

impl DocumentRecord {
    pub fn new(metadata: &DocumentMetadata) -> Self {
        Self {
            id: metadata.document_id.clone(),
            ticker: metadata.ticker.clone(),
            doc_type: metadata.doc_type.to_string(),
            fiscal_year: metadata.fiscal_year,
            filing_date: metadata.filing_date.clone(),
            stage: IngestionStage::Queued,
            chunk_count: 0,
            error: None,
            updated_at: now_secs(),
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub struct DocumentStore {
    tree: sled::Tree,
}

impl DocumentStore {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree("documents").map_err(store_err)?,
        })
    }

    pub fn put(&self, record: &DocumentRecord) -> Result<()> {
        let bytes = bincode::serialize(record).map_err(store_err)?;
        self.tree.insert(record.id.as_bytes(), bytes).map_err(store_err)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<DocumentRecord>> {
        match self.tree.get(id.as_bytes()).map_err(store_err)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes).map_err(store_err)?)),
            None => Ok(None),
        }
    }

    /// Record a stage transition, clearing any stale error unless the new
    /// stage is `Failed`.
    pub fn set_stage(&self, id: &str, stage: IngestionStage, error: Option<String>) -> Result<()> {
        let mut record = self
            .get(id)?
            .ok_or_else(|| store_err(format!("unknown document: {id}")))?;
        record.stage = stage;
        record.error = if stage == IngestionStage::Failed {
            error
        } else {
            None
        };
        record.updated_at = now_secs();
        self.put(&record)
    }

    pub fn set_chunk_count(&self, id: &str, chunk_count: usize) -> Result<()> {
        let mut record = self
            .get(id)?
            .ok_or_else(|| store_err(format!("unknown document: {id}")))?;
        record.chunk_count = chunk_count;
        record.updated_at = now_secs();
        self.put(&record)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.tree.remove(id.as_bytes()).map_err(store_err)?;
        Ok(())
    }

    pub fn ids(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for item in self.tree.iter() {
            let (key, _) = item.map_err(store_err)?;
            out.push(String::from_utf8_lossy(&key).to_string());
        }
        Ok(out)
    }
}
