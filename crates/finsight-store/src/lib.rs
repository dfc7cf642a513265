//! Durable metadata storage on sled
//!
//! Three stores share one database: document lifecycle records, chunk text
//! and attributes, and an append-only query log. Vectors never live here;
//! the vector index owns those.

pub mod chunk_store;
pub mod document_store;
pub mod query_log;

pub use chunk_store::{ChunkStore, StoredChunk};
pub use document_store::{DocumentRecord, DocumentStore};
pub use query_log::{QueryLog, QueryRecord};

use finsight_core::{Error, Result};
use std::path::Path;

/// Open (or create) the metadata database at `path`.
pub fn open_db(path: &Path) -> Result<sled::Db> {
    sled::open(path).map_err(|e| Error::Store(format!("failed to open {}: {e}", path.display())))
}

pub(crate) fn store_err(e: impl std::fmt::Display) -> Error {
    Error::Store(e.to_string())
}
