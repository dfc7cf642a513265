//! Configuration loading: file formats and environment overrides

mod env;
mod file;

pub use env::apply_env_overrides;
pub use file::load_from_file;

use crate::{Config, Result, Validate};
use std::path::PathBuf;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

/// Default config file candidates, checked in order
const DEFAULT_CANDIDATES: &[&str] = [
    ".finsight.yml",
    ".finsight.yaml",
    ".finsight.toml",
    ".finsight.json",
]
.as_slice();

/// Load configuration from the default location, falling back to built-in
/// defaults when no config file exists. Environment overrides always apply.
pub fn load_default() -> Result<Config> {
    let mut config = DEFAULT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .map(load_from_file)
        .transpose()?
        .unwrap_or_default();

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}
