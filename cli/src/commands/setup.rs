//! Shared wiring from config to running services

use anyhow::{Context, Result};
use finsight_config::Config;
use finsight_core::chunking::SentenceChunker;
use finsight_core::embeddings::select_embedder;
use finsight_core::llm::OpenAiChat;
use finsight_core::traits::{Embedder, LanguageModel};
use finsight_engine::{AnswerGenerator, IngestService, QueryService, Retriever};
use finsight_index::VectorIndex;
use finsight_store::{ChunkStore, DocumentStore, QueryLog};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct AppContext {
    pub config: Config,
    pub index: Arc<RwLock<VectorIndex>>,
    pub documents: Arc<DocumentStore>,
    pub chunks: Arc<ChunkStore>,
    pub query_log: Arc<QueryLog>,
    pub embedder: Arc<dyn Embedder>,
}

impl AppContext {
    pub async fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::from_file(path).context("failed to load config file")?,
            None => Config::load().context("failed to load config")?,
        };

        std::fs::create_dir_all(&config.storage.data_dir)
            .with_context(|| format!("cannot create {}", config.storage.data_dir.display()))?;

        let db = finsight_store::open_db(&config.storage.metadata_path())?;
        let documents = Arc::new(DocumentStore::new(&db)?);
        let chunks = Arc::new(ChunkStore::new(&db)?);
        let query_log = Arc::new(QueryLog::new(&db)?);

        let index = Arc::new(RwLock::new(
            VectorIndex::new(&config.storage.index_path(), config.embedding.dimension).await?,
        ));

        let embedder = select_embedder(&config.embedding)?;

        Ok(Self {
            config,
            index,
            documents,
            chunks,
            query_log,
            embedder,
        })
    }

    pub fn ingest_service(&self) -> IngestService {
        IngestService::new(
            SentenceChunker::new(&self.config.chunking),
            self.embedder.clone(),
            self.index.clone(),
            self.documents.clone(),
            self.chunks.clone(),
            self.config.embedding.batch_size,
        )
    }

    pub fn query_service(&self) -> Result<QueryService> {
        let llm: Arc<dyn LanguageModel> = Arc::new(OpenAiChat::new(&self.config.llm)?);
        let retriever = Retriever::new(
            self.index.clone(),
            self.embedder.clone(),
            self.config.retrieval.default_top_k,
            self.config.retrieval.max_top_k,
        );
        let generator = AnswerGenerator::new(llm);
        Ok(QueryService::new(
            retriever,
            generator,
            self.query_log.clone(),
            self.config.retrieval.query_timeout_secs,
        ))
    }
}
