//! Index/store reconciliation
//!
//! The vector index and the metadata store are written separately, so a
//! crash between the two writes can leave index rows whose document record
//! no longer exists. Reconciliation finds and removes those orphans.

use finsight_core::Result;
use finsight_index::VectorIndex;
use finsight_store::DocumentStore;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Remove index rows for documents with no metadata record. Returns the
/// orphaned document ids that were removed.
pub async fn reconcile(
    index: Arc<RwLock<VectorIndex>>,
    documents: Arc<DocumentStore>,
) -> Result<Vec<String>> {
    let known: HashSet<String> = documents.ids()?.into_iter().collect();

    let mut index = index.write().await;
    let indexed = index.document_ids().await?;

    let mut removed = Vec::new();
    for document_id in indexed {
        if !known.contains(&document_id) {
            index.delete_document(&document_id).await?;
            removed.push(document_id);
        }
    }

    if removed.is_empty() {
        info!("reconciliation found no orphaned index rows");
    } else {
        info!(count = removed.len(), "removed orphaned index rows");
    }
    Ok(removed)
}
