//! Vector index on Lance
//!
//! Stores one row per chunk: the embedding plus the filterable metadata
//! columns (ticker, doc_type, fiscal_year). Similarity search runs with the
//! metadata predicate applied before ranking, so top-k is computed over the
//! filtered population rather than filtered after the fact.

pub mod filter;
pub mod vector;

pub use filter::MetadataFilter;
pub use vector::{IndexEntry, VectorIndex};
