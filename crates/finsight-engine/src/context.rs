//! Context assembly
//!
//! Turns ranked candidates into numbered context blocks for the prompt.
//! Positions are 1-based and stable for the lifetime of one query; every
//! citation in the generated answer resolves through them. Chunk text is
//! carried whole; keeping the total within the model's context window is the
//! caller's job via `top_k`.

use finsight_core::models::{ContextBlock, RetrievalCandidate};
use std::collections::HashSet;

/// Deduplicate by chunk id (first occurrence wins, preserving rank order)
/// and assign 1-based positions.
pub fn assemble(candidates: Vec<RetrievalCandidate>) -> Vec<ContextBlock> {
    let mut seen = HashSet::new();
    let mut blocks = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if !seen.insert(candidate.chunk_id.clone()) {
            continue;
        }
        blocks.push(ContextBlock {
            position: blocks.len() + 1,
            candidate,
        });
    }

    blocks
}

/// Render blocks into the prompt body the generator sends to the model.
pub fn render(blocks: &[ContextBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        let meta = &block.candidate.metadata;
        out.push_str(&format!(
            "[{}] ({} {}{}):\n{}\n\n",
            block.position,
            meta.ticker,
            meta.doc_type,
            meta.fiscal_year
                .map(|y| format!(", FY{y}"))
                .unwrap_or_default(),
            block.candidate.text,
        ));
    }
    out
}
