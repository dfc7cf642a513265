//! Citation-validated answer generation
//!
//! The model is instructed to cite context blocks as `[n]`. After
//! generation, every marker is resolved against the assembled blocks;
//! markers that point outside the context are logged and dropped rather
//! than surfaced as fabricated citations.

use crate::context;
use finsight_core::models::{AnswerResult, Citation, ContextBlock};
use finsight_core::traits::LanguageModel;
use finsight_core::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

static CITATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d+)\]").unwrap());

/// Returned verbatim when no context is available to answer from.
pub const INSUFFICIENT_CONTEXT_ANSWER: &str =
    "I don't have enough information in the indexed documents to answer that question.";

const SYSTEM_PROMPT: &str = "\
You are a financial research assistant. Answer the question using ONLY the \
numbered context excerpts provided. Cite every claim with the excerpt number \
in square brackets, like [1] or [3]. If the excerpts do not contain enough \
information to answer, say so plainly instead of guessing.";

const EXCERPT_CHARS: usize = 200;

pub struct AnswerGenerator {
    llm: Arc<dyn LanguageModel>,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Generate an answer grounded in `blocks`.
    ///
    /// Empty context short-circuits to the insufficient-information answer
    /// without calling the model.
    pub async fn generate(&self, question: &str, blocks: &[ContextBlock]) -> Result<AnswerResult> {
        if blocks.is_empty() {
            return Ok(AnswerResult {
                answer: INSUFFICIENT_CONTEXT_ANSWER.to_string(),
                citations: Vec::new(),
            });
        }

        let user = format!(
            "Context excerpts:\n\n{}Question: {question}",
            context::render(blocks)
        );

        let answer = self.llm.complete(SYSTEM_PROMPT, &user).await?;
        let citations = extract_citations(&answer, blocks);

        Ok(AnswerResult { answer, citations })
    }
}

/// Resolve `[n]` markers against the context blocks.
///
/// Citations come back in first-appearance order, one per distinct position.
/// Out-of-range markers are discarded.
pub fn extract_citations(answer: &str, blocks: &[ContextBlock]) -> Vec<Citation> {
    let mut citations: Vec<Citation> = Vec::new();

    for capture in CITATION_RE.captures_iter(answer) {
        let position: usize = match capture[1].parse() {
            Ok(p) => p,
            Err(_) => continue,
        };

        if citations.iter().any(|c| c.position == position) {
            continue;
        }

        match blocks.iter().find(|b| b.position == position) {
            Some(block) => {
                citations.push(Citation {
                    position,
                    chunk_id: block.candidate.chunk_id.clone(),
                    excerpt: block.candidate.text.chars().take(EXCERPT_CHARS).collect(),
                    score: block.candidate.score,
                });
            }
            None => {
                debug!(position, "discarding citation marker outside context range");
            }
        }
    }

    citations
}
