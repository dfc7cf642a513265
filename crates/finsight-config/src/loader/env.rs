//! Environment variable overrides
//!
//! A small, explicit set of `FINSIGHT_*` variables can override file values.
//! Useful for deployment without editing config files.

use crate::{error::ConfigError, Config, Result};
use std::env;

/// Apply `FINSIGHT_*` environment overrides on top of a loaded config
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(dir) = env::var("FINSIGHT_DATA_DIR") {
        config.storage.data_dir = dir.into();
    }
    if let Ok(model) = env::var("FINSIGHT_EMBEDDING_MODEL") {
        config.embedding.model = model;
    }
    if let Some(dim) = parse_var::<usize>("FINSIGHT_EMBEDDING_DIMENSION")? {
        config.embedding.dimension = dim;
    }
    if let Ok(model) = env::var("FINSIGHT_LLM_MODEL") {
        config.llm.model = model;
    }
    if let Ok(base) = env::var("FINSIGHT_LLM_API_BASE") {
        config.llm.api_base = base;
    }
    if let Some(top_k) = parse_var::<usize>("FINSIGHT_TOP_K")? {
        config.retrieval.default_top_k = top_k;
    }
    Ok(())
}

fn parse_var<T: std::str::FromStr>(var: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::EnvVarError {
                var: var.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
