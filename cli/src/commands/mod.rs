pub mod ask;
pub mod ingest;
pub mod reconcile;
pub mod setup;
pub mod status;

pub use ask::handle_ask;
pub use ingest::{handle_delete, handle_ingest};
pub use reconcile::handle_reconcile;
pub use status::handle_status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Ingest financial filings and answer questions with cited sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest one or more documents' extracted text into the index
    Ingest {
        /// Plain-text files with the documents' extracted text
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Document id; defaults to the file stem (single file only)
        #[arg(long)]
        id: Option<String>,

        /// Company ticker, e.g. AAPL
        #[arg(long)]
        ticker: String,

        /// Document type: 10-K, 10-Q, 8-K, earnings-call, prospectus
        #[arg(long, default_value = "other")]
        doc_type: String,

        /// Fiscal year the document covers
        #[arg(long)]
        fiscal_year: Option<i32>,

        /// Filing date, ISO 8601
        #[arg(long)]
        filing_date: Option<String>,
    },
    /// Ask a question over the ingested documents
    Ask {
        /// The question
        question: String,

        /// Restrict to one company ticker
        #[arg(long)]
        ticker: Option<String>,

        /// Restrict to document types (repeatable)
        #[arg(long)]
        doc_type: Vec<String>,

        /// Number of context chunks to retrieve; defaults to the configured
        /// retrieval.default_top_k
        #[arg(long)]
        top: Option<usize>,
    },
    /// Show a document's ingestion status
    Status {
        /// Document id; omit to list all documents
        document_id: Option<String>,
    },
    /// Remove a document from the store and the index
    Delete { document_id: String },
    /// Remove index rows whose document record is gone
    Reconcile,
}
