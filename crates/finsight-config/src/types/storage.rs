//! Storage path configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all persistent state
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Location of the sled metadata database
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join("meta.db")
    }

    /// Location of the lance vector index
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join("vectors.lance")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl crate::validation::Validate for StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(crate::error::ConfigError::validation(
                "storage.data_dir",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".finsight")
}
