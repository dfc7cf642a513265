//! Configuration management for finsight
//!
//! Provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Environment variable overrides (`FINSIGHT_*`)
//! - Type-safe configuration structs with fail-fast validation
//!
//! # Example
//!
//! ```no_run
//! use finsight_config::Config;
//!
//! // Load from the default location (.finsight.{yml,toml,json})
//! let config = Config::load()?;
//!
//! let chunk_size = config.chunking.chunk_size_tokens;
//! let top_k = config.retrieval.default_top_k;
//! # Ok::<(), finsight_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, Result};
pub use types::*;
pub use validation::Validate;
