pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod llm;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
