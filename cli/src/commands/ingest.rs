use super::setup::AppContext;
use anyhow::{bail, Context, Result};
use finsight_core::models::{DocumentMetadata, DocumentType};
use finsight_engine::ingest::{run_jobs, IngestJob};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[allow(clippy::too_many_arguments)]
pub async fn handle_ingest(
    config_path: Option<&Path>,
    files: Vec<PathBuf>,
    id: Option<String>,
    ticker: String,
    doc_type: String,
    fiscal_year: Option<i32>,
    filing_date: Option<String>,
) -> Result<()> {
    if id.is_some() && files.len() > 1 {
        bail!("--id can only be used with a single file");
    }

    let ticker = ticker.to_uppercase();
    let doc_type = DocumentType::from_name(&doc_type);

    let mut jobs = Vec::with_capacity(files.len());
    for file in &files {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("cannot read {}", file.display()))?;
        let document_id = id.clone().unwrap_or_else(|| {
            file.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "document".to_string())
        });
        jobs.push(IngestJob {
            metadata: DocumentMetadata {
                document_id,
                ticker: ticker.clone(),
                doc_type,
                fiscal_year,
                filing_date: filing_date.clone(),
            },
            text,
        });
    }

    let ctx = AppContext::load(config_path).await?;
    let service = Arc::new(ctx.ingest_service());

    let submitted = jobs.len();
    let reports = run_jobs(service, jobs, ctx.config.ingest.concurrency).await;

    for report in &reports {
        println!(
            "Ingested {} ({} chunks, stage: {})",
            report.document_id, report.chunk_count, report.stage
        );
    }

    if reports.len() < submitted {
        bail!("{} of {} document(s) failed to ingest", submitted - reports.len(), submitted);
    }
    Ok(())
}

pub async fn handle_delete(config_path: Option<&Path>, document_id: String) -> Result<()> {
    let ctx = AppContext::load(config_path).await?;
    let service = ctx.ingest_service();
    service.delete(&document_id).await?;
    println!("Deleted {document_id}");
    Ok(())
}
