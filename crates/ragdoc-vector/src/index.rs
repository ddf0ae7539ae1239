use chrono::{DateTime, Utc};
use tracing::error;

use ragdoc_core::chunker::ChunkingConfig;
use ragdoc_core::tokenize::Term;
use ragdoc_core::types::{Chunk, IndexStatus};
use ragdoc_core::{Error, Result};
use ragdoc_text::{DocumentVector, TfIdfVectorizer, Vocabulary};

/// A chunk with its TF-IDF vector. Immutable once installed.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub vector: DocumentVector,
}

/// Facts about the source document recorded at ingestion time.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub file_name: String,
    pub chunking: ChunkingConfig,
    pub text_length: usize,
    pub content_hash: String,
    pub loaded_at: DateTime<Utc>,
}

/// One fully vectorized document.
///
/// Every chunk vector has the dimension of `vectorizer`; the constructor
/// refuses anything else, so a published index is always consistent.
#[derive(Debug)]
pub struct DocumentIndex {
    info: DocumentInfo,
    chunks: Vec<IndexedChunk>,
    vectorizer: TfIdfVectorizer,
    tokenized_chunks: Vec<Vec<Term>>,
}

impl DocumentIndex {
    pub fn new(
        info: DocumentInfo,
        chunks: Vec<IndexedChunk>,
        vectorizer: TfIdfVectorizer,
        tokenized_chunks: Vec<Vec<Term>>,
    ) -> Result<Self> {
        if chunks.len() != tokenized_chunks.len() {
            error!(
                chunks = chunks.len(),
                tokenized = tokenized_chunks.len(),
                "chunk and token lists differ in length"
            );
            return Err(Error::DimensionMismatch { left: chunks.len(), right: tokenized_chunks.len() });
        }
        let dim = vectorizer.dimension();
        if let Some(bad) = chunks.iter().find(|c| c.vector.len() != dim) {
            error!(vector = bad.vector.len(), vocabulary = dim, chunk = ?bad.chunk.index(), "chunk vector has wrong dimension");
            return Err(Error::DimensionMismatch { left: bad.vector.len(), right: dim });
        }
        Ok(Self { info, chunks, vectorizer, tokenized_chunks })
    }

    pub fn info(&self) -> &DocumentInfo { &self.info }

    pub fn file_name(&self) -> &str { &self.info.file_name }

    pub fn chunks(&self) -> &[IndexedChunk] { &self.chunks }

    pub fn len(&self) -> usize { self.chunks.len() }

    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }

    pub fn vocabulary(&self) -> &Vocabulary { self.vectorizer.vocabulary() }

    pub fn vectorizer(&self) -> &TfIdfVectorizer { &self.vectorizer }

    pub fn tokenized_chunks(&self) -> &[Vec<Term>] { &self.tokenized_chunks }

    pub fn status(&self) -> IndexStatus {
        IndexStatus {
            loaded: true,
            file_name: Some(self.info.file_name.clone()),
            total_chunks: self.chunks.len(),
            vocabulary_size: self.vectorizer.dimension(),
            loaded_at: Some(self.info.loaded_at),
        }
    }
}
