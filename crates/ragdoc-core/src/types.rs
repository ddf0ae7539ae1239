//! Domain types shared by the chunker, the index and the pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primitive metadata value attached to a chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetaValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<usize> for MetaValue {
    fn from(v: usize) -> Self { Self::Int(i64::try_from(v).unwrap_or(i64::MAX)) }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self { Self::Text(v.to_string()) }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self { Self::Text(v) }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self { Self::Bool(v) }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self { Self::Float(v) }
}

pub type Meta = BTreeMap<String, MetaValue>;

/// Metadata keys every chunk carries.
pub mod meta_keys {
    pub const CHUNK_INDEX: &str = "chunk_index";
    pub const START: &str = "start";
    pub const LINES_FROM: &str = "lines_from";
    pub const LINES_TO: &str = "lines_to";
}

/// A contiguous, possibly overlapping slice of the source document.
///
/// - `text`: the chunk payload
/// - `metadata`: position info (`chunk_index`, `start`, `lines_from`, `lines_to`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: Meta,
}

impl Chunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), metadata: Meta::new() }
    }

    /// Position of the chunk in document order, if recorded.
    pub fn index(&self) -> Option<usize> {
        self.metadata
            .get(meta_keys::CHUNK_INDEX)
            .and_then(MetaValue::as_int)
            .and_then(|v| usize::try_from(v).ok())
    }
}

/// One retrieved passage. `content` is the full chunk text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPassage {
    pub content: String,
    pub similarity: f64,
    pub metadata: Meta,
}

impl RankedPassage {
    /// Display form of the content: the first `max_chars` characters,
    /// followed by `...` when something was cut.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.content.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.content[..cut]),
            None => self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub ranked_passages: Vec<RankedPassage>,
    pub file_name: String,
}

impl QueryResult {
    pub fn passage_texts(&self) -> Vec<String> {
        self.ranked_passages.iter().map(|p| p.content.clone()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub query: String,
    pub ranked_passages: Vec<RankedPassage>,
    pub generated_answer: String,
    pub file_name: String,
}

/// Summary returned by a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub file_name: String,
    pub total_chunks: usize,
    pub vocabulary_size: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub text_length: usize,
    pub content_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexStatus {
    pub loaded: bool,
    pub file_name: Option<String>,
    pub total_chunks: usize,
    pub vocabulary_size: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}
