use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use ragdoc_core::chunker::{Chunker, ChunkingConfig};
use ragdoc_core::tokenize::{tokenize, Term};
use ragdoc_core::traits::DocumentSource;
use ragdoc_core::types::IngestReport;
use ragdoc_core::{Error, Result};
use ragdoc_text::TfIdfVectorizer;
use ragdoc_vector::{DocumentIndex, DocumentInfo, IndexStore, IndexedChunk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Empty,
    Chunking,
    Vectorizing,
    Loaded,
    Failed,
}

impl IngestStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Chunking => "chunking",
            Self::Vectorizing => "vectorizing",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

/// Chunks, vectorizes and installs one document into the shared store.
pub struct IngestionPipeline {
    store: Arc<IndexStore>,
    stage: Mutex<IngestStage>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<IndexStore>) -> Self {
        let stage = if store.is_loaded() { IngestStage::Loaded } else { IngestStage::Empty };
        Self { store, stage: Mutex::new(stage) }
    }

    /// Last stage reached. Settles back to `Loaded` or `Empty` after a
    /// failure, depending on whether a document is still installed.
    pub fn stage(&self) -> IngestStage {
        match *self.stage.lock() {
            IngestStage::Loaded if !self.store.is_loaded() => IngestStage::Empty,
            stage => stage,
        }
    }

    fn enter(&self, file_name: &str, stage: IngestStage) {
        *self.stage.lock() = stage;
        debug!(file = file_name, stage = stage.as_str(), "ingestion stage");
    }

    fn fail(&self, file_name: &str, error: &Error) {
        warn!(file = file_name, stage = IngestStage::Failed.as_str(), error = %error, "ingestion failed");
        let settled = if self.store.is_loaded() { IngestStage::Loaded } else { IngestStage::Empty };
        *self.stage.lock() = settled;
    }

    /// Replace the active document with `text`.
    ///
    /// Nothing is published until the whole index is built; on any error the
    /// previously loaded document stays active.
    pub fn ingest(&self, text: &str, file_name: &str, config: ChunkingConfig) -> Result<IngestReport> {
        if let Err(e) = config.validate() {
            self.fail(file_name, &e);
            return Err(e);
        }
        let start = Instant::now();
        let index = match build_index_staged(text, file_name, config, &mut |stage| self.enter(file_name, stage)) {
            Ok(index) => index,
            Err(e) => {
                self.fail(file_name, &e);
                return Err(e);
            }
        };
        let report = report_for(&index);
        self.store.replace(index);
        self.enter(file_name, IngestStage::Loaded);
        info!(
            file = file_name,
            chunks = report.total_chunks,
            vocabulary = report.vocabulary_size,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "document ingested"
        );
        Ok(report)
    }

    /// Read `source` and ingest its text under the source's name.
    pub fn ingest_source(&self, source: &dyn DocumentSource, config: ChunkingConfig) -> Result<IngestReport> {
        config.validate()?;
        let text = source.read_text().map_err(|e| {
            let error = Error::Source(format!("{}: {:#}", source.name(), e));
            self.fail(source.name(), &error);
            error
        })?;
        self.ingest(&text, source.name(), config)
    }
}

/// Build a complete `DocumentIndex` for `text` without touching any store.
///
/// Only the structural chunking constraints are checked here (`chunk_size > 0`,
/// `chunk_overlap < chunk_size`); the allowed range is enforced by
/// [`IngestionPipeline::ingest`].
pub fn build_index(text: &str, file_name: &str, config: ChunkingConfig) -> Result<DocumentIndex> {
    build_index_staged(text, file_name, config, &mut |stage| {
        debug!(file = file_name, stage = stage.as_str(), "ingestion stage");
    })
}

fn build_index_staged(
    text: &str,
    file_name: &str,
    config: ChunkingConfig,
    on_stage: &mut dyn FnMut(IngestStage),
) -> Result<DocumentIndex> {
    if config.chunk_size == 0 || config.chunk_overlap >= config.chunk_size {
        return Err(Error::Configuration(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            config.chunk_overlap, config.chunk_size
        )));
    }
    if text.trim().is_empty() {
        return Err(Error::EmptyInput(format!("document '{file_name}' contains no text")));
    }

    on_stage(IngestStage::Chunking);
    let chunks = Chunker::new(config).split(text);
    if chunks.is_empty() {
        return Err(Error::EmptyInput(format!("document '{file_name}' produced no chunks")));
    }

    on_stage(IngestStage::Vectorizing);
    let tokenized: Vec<Vec<Term>> = chunks.iter().map(|c| tokenize(&c.text)).collect();
    let vectorizer = TfIdfVectorizer::fit(&tokenized);
    let indexed = chunks
        .into_iter()
        .zip(&tokenized)
        .map(|(chunk, terms)| IndexedChunk { vector: vectorizer.transform(terms), chunk })
        .collect();

    let info = DocumentInfo {
        file_name: file_name.to_string(),
        chunking: config,
        text_length: text.chars().count(),
        content_hash: blake3::hash(text.as_bytes()).to_hex().to_string(),
        loaded_at: Utc::now(),
    };
    DocumentIndex::new(info, indexed, vectorizer, tokenized)
}

fn report_for(index: &DocumentIndex) -> IngestReport {
    let info = index.info();
    IngestReport {
        file_name: info.file_name.clone(),
        total_chunks: index.len(),
        vocabulary_size: index.vocabulary().len(),
        chunk_size: info.chunking.chunk_size,
        chunk_overlap: info.chunking.chunk_overlap,
        text_length: info.text_length,
        content_hash: info.content_hash.clone(),
    }
}
