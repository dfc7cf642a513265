use super::setup::AppContext;
use anyhow::Result;
use std::path::Path;

pub async fn handle_reconcile(config_path: Option<&Path>) -> Result<()> {
    let ctx = AppContext::load(config_path).await?;
    let removed = finsight_engine::reconcile::reconcile(ctx.index.clone(), ctx.documents.clone()).await?;

    if removed.is_empty() {
        println!("Index and metadata store are consistent.");
    } else {
        println!("Removed orphaned index rows for {} document(s):", removed.len());
        for id in removed {
            println!("  {id}");
        }
    }
    Ok(())
}
