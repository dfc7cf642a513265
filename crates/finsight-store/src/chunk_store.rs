//! Chunk text and attributes, keyed by chunk id
//!
//! A secondary tree maps document id to its chunk ids so deleting a document
//! never scans the whole chunk tree.

use crate::store_err;
use finsight_core::models::Chunk;
use finsight_core::Result;
use serde::{Deserialize, Serialize};
use sled::Db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub document_id: String,
    pub text: String,
    pub token_count: usize,
    pub ordinal: usize,
    pub page_number: Option<u32>,
    pub section: Option<String>,
    // Embeddings are NOT stored here; the vector index owns them.
}

impl From<&Chunk> for StoredChunk {
    fn from(chunk: &Chunk) -> Self {
        Self {
            id: chunk.id.clone(),
            document_id: chunk.document_id.clone(),
            text: chunk.text.clone(),
            token_count: chunk.token_count,
            ordinal: chunk.ordinal,
            page_number: chunk.page_number,
            section: chunk.section.clone(),
        }
    }
}

pub struct ChunkStore {
    chunks_tree: sled::Tree,
    doc_chunks_tree: sled::Tree, // document_id -> Vec<chunk_id>
}

impl ChunkStore {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self {
            chunks_tree: db.open_tree("chunks").map_err(store_err)?,
            doc_chunks_tree: db.open_tree("doc_chunks").map_err(store_err)?,
        })
    }

    /// Store all chunks of one document and replace its id index.
    pub fn add_chunks(&self, document_id: &str, chunks: &[Chunk]) -> Result<()> {
        let mut ids = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let stored = StoredChunk::from(chunk);
            let bytes = bincode::serialize(&stored).map_err(store_err)?;
            self.chunks_tree
                .insert(chunk.id.as_bytes(), bytes)
                .map_err(store_err)?;
            ids.push(chunk.id.clone());
        }

        let bytes = bincode::serialize(&ids).map_err(store_err)?;
        self.doc_chunks_tree
            .insert(document_id.as_bytes(), bytes)
            .map_err(store_err)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<StoredChunk>> {
        match self.chunks_tree.get(id.as_bytes()).map_err(store_err)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes).map_err(store_err)?)),
            None => Ok(None),
        }
    }

    pub fn chunks_for_document(&self, document_id: &str) -> Result<Vec<StoredChunk>> {
        let ids = self.chunk_ids_for_document(document_id)?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(chunk) = self.get(&id)? {
                out.push(chunk);
            }
        }
        Ok(out)
    }

    pub fn chunk_ids_for_document(&self, document_id: &str) -> Result<Vec<String>> {
        match self
            .doc_chunks_tree
            .get(document_id.as_bytes())
            .map_err(store_err)?
        {
            Some(bytes) => Ok(bincode::deserialize(&bytes).map_err(store_err)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn delete_by_document(&self, document_id: &str) -> Result<()> {
        for id in self.chunk_ids_for_document(document_id)? {
            self.chunks_tree.remove(id.as_bytes()).map_err(store_err)?;
        }
        self.doc_chunks_tree
            .remove(document_id.as_bytes())
            .map_err(store_err)?;
        Ok(())
    }
}
