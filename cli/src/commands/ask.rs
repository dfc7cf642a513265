use super::setup::AppContext;
use anyhow::Result;
use finsight_core::models::{DocumentType, QueryRequest};
use std::path::Path;

pub async fn handle_ask(
    config_path: Option<&Path>,
    question: String,
    ticker: Option<String>,
    doc_types: Vec<String>,
    top: Option<usize>,
) -> Result<()> {
    let ctx = AppContext::load(config_path).await?;
    let service = ctx.query_service()?;

    let request = QueryRequest {
        text: question,
        company: ticker.map(|t| t.to_uppercase()),
        document_types: doc_types
            .iter()
            .map(|t| DocumentType::from_name(t))
            .collect(),
        top_k: top,
    };

    let result = service.submit_query(&request).await?;

    println!("{}", result.answer);

    if !result.citations.is_empty() {
        println!("\nSources:");
        for citation in &result.citations {
            println!(
                "  [{}] {} (score {:.3})\n      {}",
                citation.position,
                citation.chunk_id,
                citation.score,
                citation.excerpt.replace('\n', " "),
            );
        }
    }
    Ok(())
}
