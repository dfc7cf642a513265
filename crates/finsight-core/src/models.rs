use serde::{Deserialize, Serialize};

/// Filing category of an ingested document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DocumentType {
    TenK,
    TenQ,
    EightK,
    EarningsCall,
    Prospectus,
    Other,
}

impl DocumentType {
    pub fn from_name(name: &str) -> Self {
        match name.to_uppercase().as_str() {
            "10-K" | "10K" | "TENK" => DocumentType::TenK,
            "10-Q" | "10Q" | "TENQ" => DocumentType::TenQ,
            "8-K" | "8K" | "EIGHTK" => DocumentType::EightK,
            "EARNINGS" | "EARNINGS-CALL" | "EARNINGSCALL" => DocumentType::EarningsCall,
            "PROSPECTUS" => DocumentType::Prospectus,
            _ => DocumentType::Other,
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(DocumentType::from_name(s))
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DocumentType::TenK => "10-K",
            DocumentType::TenQ => "10-Q",
            DocumentType::EightK => "8-K",
            DocumentType::EarningsCall => "earnings-call",
            DocumentType::Prospectus => "prospectus",
            DocumentType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Document-level attributes supplied by the file-intake collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_id: String,
    pub ticker: String,
    pub doc_type: DocumentType,
    pub fiscal_year: Option<i32>,
    pub filing_date: Option<String>,
}

/// Bounded-length span of a document's text; the retrieval unit.
///
/// Immutable once created. Owned exclusively by the document it derives
/// from and deleted together with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub document_id: String,
    pub text: String,
    pub token_count: usize,
    /// Position within the document, starting at 0
    pub ordinal: usize,
    pub page_number: Option<u32>,
    pub section: Option<String>,
    pub embedding: Option<Vec<f32>>,
}

/// Filterable attributes carried on every index entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMetadata {
    pub document_id: String,
    pub ticker: String,
    pub doc_type: DocumentType,
    pub fiscal_year: Option<i32>,
}

/// A chunk returned by retrieval for a given query
///
/// The score is a similarity measure whose ordering is defined by the index
/// implementation; values are not comparable across index backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    pub chunk_id: String,
    pub text: String,
    pub score: f32,
    pub metadata: CandidateMetadata,
}

/// A natural-language question plus optional metadata filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    /// Equality filter on company ticker; absent means unrestricted
    pub company: Option<String>,
    /// Set-membership filter on document type; empty means unrestricted
    pub document_types: Vec<DocumentType>,
    /// Candidates to retrieve; absent falls back to the configured default
    pub top_k: Option<usize>,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            company: None,
            document_types: Vec::new(),
            top_k: None,
        }
    }
}

/// A candidate formatted with a stable 1-based citation position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBlock {
    pub position: usize,
    pub candidate: RetrievalCandidate,
}

/// A resolved reference from generated text back to a context block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based position of the cited context block
    pub position: usize,
    pub chunk_id: String,
    pub excerpt: String,
    pub score: f32,
}

/// A generated answer with its resolved citations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub citations: Vec<Citation>,
}

/// Per-document ingestion lifecycle. Transitions are one-way; recovery from
/// `Failed` is re-invoking the whole ingestion, which is safe to re-run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IngestionStage {
    Queued,
    Extracting,
    Chunking,
    Embedding,
    Storing,
    Completed,
    Failed,
}

impl std::fmt::Display for IngestionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IngestionStage::Queued => "queued",
            IngestionStage::Extracting => "extracting",
            IngestionStage::Chunking => "chunking",
            IngestionStage::Embedding => "embedding",
            IngestionStage::Storing => "storing",
            IngestionStage::Completed => "completed",
            IngestionStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Result of one document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    pub document_id: String,
    pub chunk_count: usize,
    pub stage: IngestionStage,
}

/// Status snapshot for introspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionStatus {
    pub stage: IngestionStage,
    pub chunk_count: usize,
    pub error: Option<String>,
}
