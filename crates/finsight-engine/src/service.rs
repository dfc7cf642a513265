//! Query service
//!
//! The single entry point for answering questions: retrieve, assemble,
//! generate, log. A configurable deadline bounds the whole sequence;
//! timed-out work is abandoned, never delivered late.

use crate::answer::{AnswerGenerator, INSUFFICIENT_CONTEXT_ANSWER};
use crate::context;
use crate::retrieve::Retriever;
use finsight_core::models::{AnswerResult, QueryRequest};
use finsight_core::{Error, Result};
use finsight_store::{QueryLog, QueryRecord};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub struct QueryService {
    retriever: Retriever,
    generator: AnswerGenerator,
    query_log: Arc<QueryLog>,
    timeout_secs: u64,
}

impl QueryService {
    pub fn new(
        retriever: Retriever,
        generator: AnswerGenerator,
        query_log: Arc<QueryLog>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            retriever,
            generator,
            query_log,
            timeout_secs,
        }
    }

    pub async fn submit_query(&self, request: &QueryRequest) -> Result<AnswerResult> {
        let mut record = QueryRecord::now(
            request.text.clone(),
            request.company.clone(),
            request.document_types.iter().map(|t| t.to_string()).collect(),
            request.top_k,
        );

        let outcome = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            self.answer(request, &mut record),
        )
        .await;

        let result = match outcome {
            Ok(result) => result,
            Err(_) => {
                record.outcome = "timeout".to_string();
                Err(Error::Timeout {
                    seconds: self.timeout_secs,
                })
            }
        };

        // Logging never masks the query result.
        if let Err(e) = self.query_log.append(&record) {
            warn!(error = %e, "failed to append query log record");
        }

        result
    }

    async fn answer(&self, request: &QueryRequest, record: &mut QueryRecord) -> Result<AnswerResult> {
        let candidates = match self.retriever.retrieve(request).await {
            Ok(candidates) => candidates,
            Err(Error::NoResults) => {
                record.outcome = "insufficient".to_string();
                record.answer = Some(INSUFFICIENT_CONTEXT_ANSWER.to_string());
                return Ok(AnswerResult {
                    answer: INSUFFICIENT_CONTEXT_ANSWER.to_string(),
                    citations: Vec::new(),
                });
            }
            Err(e) => {
                record.outcome = "error".to_string();
                return Err(e);
            }
        };

        record.candidate_count = candidates.len();
        let blocks = context::assemble(candidates);

        match self.generator.generate(&request.text, &blocks).await {
            Ok(result) => {
                record.citation_count = result.citations.len();
                record.answer = Some(result.answer.clone());
                record.outcome = if result.answer == INSUFFICIENT_CONTEXT_ANSWER {
                    "insufficient".to_string()
                } else {
                    "answered".to_string()
                };
                Ok(result)
            }
            Err(e) => {
                record.outcome = "error".to_string();
                Err(e)
            }
        }
    }
}
