use super::setup::AppContext;
use anyhow::Result;
use std::path::Path;

pub async fn handle_status(config_path: Option<&Path>, document_id: Option<String>) -> Result<()> {
    let ctx = AppContext::load(config_path).await?;

    match document_id {
        Some(id) => match ctx.documents.get(&id)? {
            Some(record) => {
                println!("Document: {}", record.id);
                println!("Ticker: {}", record.ticker);
                println!("Type: {}", record.doc_type);
                if let Some(year) = record.fiscal_year {
                    println!("Fiscal year: {year}");
                }
                println!("Stage: {}", record.stage);
                println!("Chunks: {}", record.chunk_count);
                if let Some(error) = &record.error {
                    println!("Error: {error}");
                }
            }
            None => println!("No document with id {id}"),
        },
        None => {
            let ids = ctx.documents.ids()?;
            if ids.is_empty() {
                println!("No documents ingested.");
                return Ok(());
            }
            println!("{} document(s):", ids.len());
            for id in ids {
                if let Some(record) = ctx.documents.get(&id)? {
                    println!(
                        "  {} [{}] {} - {} ({} chunks)",
                        record.id, record.ticker, record.doc_type, record.stage, record.chunk_count
                    );
                }
            }
        }
    }
    Ok(())
}
