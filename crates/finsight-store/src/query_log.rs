//! Append-only query log
//!
//! Records every submitted query with its outcome for later inspection.
//! Keys are sled-generated monotonic ids in big-endian form so iteration
//! order is submission order.

use crate::store_err;
use finsight_core::Result;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub text: String,
    pub company: Option<String>,
    pub document_types: Vec<String>,
    /// Requested candidate count; absent when the caller used the default
    pub top_k: Option<usize>,
    pub candidate_count: usize,
    pub citation_count: usize,
    /// The generated answer, absent when the query failed or timed out
    pub answer: Option<String>,
    /// Outcome label: "answered", "insufficient", "timeout", or "error"
    pub outcome: String,
    pub timestamp: u64,
}

impl QueryRecord {
    pub fn now(
        text: impl Into<String>,
        company: Option<String>,
        document_types: Vec<String>,
        top_k: Option<usize>,
    ) -> Self {
        Self {
            text: text.into(),
            company,
            document_types,
            top_k,
            candidate_count: 0,
            citation_count: 0,
            answer: None,
            outcome: String::new(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }
}

pub struct QueryLog {
    db: Db,
    tree: sled::Tree,
}

impl QueryLog {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self {
            db: db.clone(),
            tree: db.open_tree("query_log").map_err(store_err)?,
        })
    }

    pub fn append(&self, record: &QueryRecord) -> Result<u64> {
        let id = self.db.generate_id().map_err(store_err)?;
        let bytes = bincode::serialize(record).map_err(store_err)?;
        self.tree.insert(id.to_be_bytes(), bytes).map_err(store_err)?;
        Ok(id)
    }

    /// The most recent `n` records, newest first.
    pub fn recent(&self, n: usize) -> Result<Vec<QueryRecord>> {
        let mut out = Vec::with_capacity(n);
        for item in self.tree.iter().rev().take(n) {
            let (_, bytes) = item.map_err(store_err)?;
            out.push(bincode::deserialize(&bytes).map_err(store_err)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_returns_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        let log = QueryLog::new(&db).unwrap();

        for i in 0..5 {
            let mut record = QueryRecord::now(format!("q{i}"), None, Vec::new(), Some(5));
            record.outcome = "answered".to_string();
            log.append(&record).unwrap();
        }

        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text, "q4");
        assert_eq!(recent[1].text, "q3");
    }
}
