mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_ask, handle_delete, handle_ingest, handle_reconcile, handle_status, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Ingest {
            files,
            id,
            ticker,
            doc_type,
            fiscal_year,
            filing_date,
        } => {
            handle_ingest(config_path, files, id, ticker, doc_type, fiscal_year, filing_date).await?;
        }
        Commands::Ask {
            question,
            ticker,
            doc_type,
            top,
        } => {
            handle_ask(config_path, question, ticker, doc_type, top).await?;
        }
        Commands::Status { document_id } => {
            handle_status(config_path, document_id).await?;
        }
        Commands::Delete { document_id } => {
            handle_delete(config_path, document_id).await?;
        }
        Commands::Reconcile => {
            handle_reconcile(config_path).await?;
        }
    }

    Ok(())
}
