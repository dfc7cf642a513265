//! Document ingestion
//!
//! One document moves through a fixed sequence of stages; every transition
//! is persisted to the document store before the stage's work begins, so a
//! crash leaves an honest record of how far ingestion got.

pub mod pipeline;
pub mod workers;

pub use pipeline::IngestService;
pub use workers::{run_jobs, IngestJob};
