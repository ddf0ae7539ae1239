//! ragdoc-pipeline
//!
//! Ingestion and query pipelines over a shared [`IndexStore`], plus the
//! [`RagEngine`] facade used by applications.

use std::sync::Arc;

use ragdoc_core::chunker::ChunkingConfig;
use ragdoc_core::config::{RetrievalConfig, Settings};
use ragdoc_core::traits::{DocumentSource, Generator};
use ragdoc_core::types::{IndexStatus, IngestReport, QueryAnswer, QueryResult};
use ragdoc_core::Result;
use ragdoc_vector::IndexStore;

pub mod ingest;
pub mod query;

pub use ingest::{build_index, IngestStage, IngestionPipeline};
pub use query::{sanitize_message, QueryPipeline};

/// Cheap-to-clone handle over one document store and both pipelines.
#[derive(Clone)]
pub struct RagEngine {
    store: Arc<IndexStore>,
    ingestion: Arc<IngestionPipeline>,
    query: Arc<QueryPipeline>,
}

impl RagEngine {
    pub fn new(generator: Arc<dyn Generator>, retrieval: RetrievalConfig) -> Self {
        let store = Arc::new(IndexStore::new());
        Self {
            ingestion: Arc::new(IngestionPipeline::new(Arc::clone(&store))),
            query: Arc::new(QueryPipeline::new(Arc::clone(&store), generator, retrieval)),
            store,
        }
    }

    /// Engine wired with the configured generation backend.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let generator: Arc<dyn Generator> = Arc::from(ragdoc_llm::get_default_generator(&settings.generation)?);
        Ok(Self::new(generator, settings.retrieval))
    }

    pub fn ingest(&self, text: &str, file_name: &str, config: ChunkingConfig) -> Result<IngestReport> {
        self.ingestion.ingest(text, file_name, config)
    }

    pub fn ingest_source(&self, source: &dyn DocumentSource, config: ChunkingConfig) -> Result<IngestReport> {
        self.ingestion.ingest_source(source, config)
    }

    pub fn retrieve(&self, query: &str, k: usize) -> Result<QueryResult> {
        self.query.retrieve(query, k)
    }

    pub async fn answer(&self, result: &QueryResult) -> Result<String> {
        self.query.answer(result).await
    }

    pub async fn ask(&self, query: &str, k: usize) -> Result<QueryAnswer> {
        self.query.ask(query, k).await
    }

    pub fn default_k(&self) -> usize {
        self.query.default_k()
    }

    /// Drop the active document. Always succeeds.
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn status(&self) -> IndexStatus {
        self.store.describe()
    }

    pub fn ingest_stage(&self) -> IngestStage {
        self.ingestion.stage()
    }
}
