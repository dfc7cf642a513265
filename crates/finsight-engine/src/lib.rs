//! Retrieval, answer generation, and ingestion orchestration
//!
//! The engine wires the core traits (embedder, language model) to the
//! vector index and metadata store. Construction is plain dependency
//! injection via `Arc`; nothing here owns global state.

pub mod answer;
pub mod context;
pub mod ingest;
pub mod reconcile;
pub mod retrieve;
pub mod service;

pub use answer::AnswerGenerator;
pub use ingest::{IngestJob, IngestService};
pub use retrieve::Retriever;
pub use service::QueryService;
