//! File-based configuration loading

use super::ConfigFormat;
use crate::{error::ConfigError, Config, Result, Validate};
use std::fs;
use std::path::Path;

/// Load configuration from a file, detecting the format from the extension
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = detect_format(path)?;

    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let location = path
        .to_str()
        .map(|p| format!(" in {}", p))
        .unwrap_or_default();

    let config: Config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            format: "YAML",
            location: location.clone(),
            message: e.to_string(),
        })?,
        ConfigFormat::Toml => toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            format: "TOML",
            location: location.clone(),
            message: e.to_string(),
        })?,
        ConfigFormat::Json => serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            format: "JSON",
            location: location.clone(),
            message: e.to_string(),
        })?,
    };

    config.validate()?;

    Ok(config)
}

/// Detect configuration format from file extension
fn detect_format(path: &Path) -> Result<ConfigFormat> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yml") | Some("yaml") => Ok(ConfigFormat::Yaml),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some("json") => Ok(ConfigFormat::Json),
        _ => Err(ConfigError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_yaml() {
        assert_eq!(
            detect_format(&PathBuf::from("config.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            detect_format(&PathBuf::from("config.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
    }

    #[test]
    fn test_detect_toml() {
        assert_eq!(
            detect_format(&PathBuf::from("config.toml")).unwrap(),
            ConfigFormat::Toml
        );
    }

    #[test]
    fn test_unknown_format() {
        assert!(detect_format(&PathBuf::from("config.txt")).is_err());
    }

    #[test]
    fn load_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.yml");
        std::fs::write(
            &path,
            "chunking:\n  chunk_size_tokens: 256\n  overlap_tokens: 32\n",
        )
        .unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.chunking.chunk_size_tokens, 256);
        assert_eq!(config.chunking.overlap_tokens, 32);
        // Untouched sections keep defaults
        assert_eq!(config.retrieval.default_top_k, 5);
    }

    #[test]
    fn invalid_values_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.yml");
        std::fs::write(
            &path,
            "chunking:\n  chunk_size_tokens: 64\n  overlap_tokens: 64\n",
        )
        .unwrap();

        assert!(load_from_file(&path).is_err());
    }
}
