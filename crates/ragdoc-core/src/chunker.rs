//! Recursive character chunking with overlap.
//!
//! Text is split on the highest-priority separator it contains (paragraph,
//! line, sentence, word, then single characters). Pieces that fit are merged
//! into windows of at most `chunk_size` characters; oversized pieces are split
//! again with the remaining separators. Consecutive windows share up to
//! `chunk_overlap` trailing characters.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{meta_keys, Chunk, Meta, MetaValue};

pub const MIN_CHUNK_SIZE: usize = 100;
pub const MAX_CHUNK_SIZE: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 100 }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(Error::Configuration(format!(
                "chunk_size must be within {MIN_CHUNK_SIZE}..={MAX_CHUNK_SIZE}, got {}",
                self.chunk_size
            )));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// One splitting strategy of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Split before every occurrence of the literal; the literal stays at the
    /// start of the following piece.
    Literal(&'static str),
    /// Split into single characters. Always applicable, so it terminates the cascade.
    Characters,
}

pub const DEFAULT_SEPARATORS: [Separator; 5] = [
    Separator::Literal("\n\n"),
    Separator::Literal("\n"),
    Separator::Literal(". "),
    Separator::Literal(" "),
    Separator::Characters,
];

impl Separator {
    fn is_present(self, text: &str) -> bool {
        match self {
            Self::Literal(sep) => text.contains(sep),
            Self::Characters => true,
        }
    }

    /// Pieces of `text` with their byte offsets into `text`.
    fn split(self, text: &str) -> Vec<(usize, &str)> {
        match self {
            Self::Literal(sep) => {
                let mut pieces = Vec::new();
                let mut last = 0;
                for (idx, _) in text.match_indices(sep) {
                    if idx > last {
                        pieces.push((last, &text[last..idx]));
                    }
                    last = idx;
                }
                if last < text.len() {
                    pieces.push((last, &text[last..]));
                }
                pieces
            }
            Self::Characters => text
                .char_indices()
                .map(|(i, c)| (i, &text[i..i + c.len_utf8()]))
                .collect(),
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub struct Chunker {
    config: ChunkingConfig,
    separators: Vec<Separator>,
}

impl Chunker {
    /// The caller is responsible for `config.validate()`.
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config, separators: DEFAULT_SEPARATORS.to_vec() }
    }

    /// Split `text` into chunks in document order, with position metadata.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let mut pieces = Vec::new();
        self.split_recursive(text, 0, &self.separators, &mut pieces);
        debug!(chunks = pieces.len(), chars = char_len(text), "split text");
        attach_positions(text, pieces)
    }

    /// `offset` is the byte position of `text` inside the whole document.
    fn split_recursive(&self, text: &str, offset: usize, separators: &[Separator], out: &mut Vec<Piece>) {
        let idx = separators
            .iter()
            .position(|s| s.is_present(text))
            .unwrap_or(separators.len().saturating_sub(1));
        let separator = separators.get(idx).copied().unwrap_or(Separator::Characters);
        let rest = separators.get(idx + 1..).unwrap_or(&[]);

        let mut fitting: Vec<(usize, &str)> = Vec::new();
        for (local, piece) in separator.split(text) {
            let at = offset + local;
            if char_len(piece) < self.config.chunk_size {
                fitting.push((at, piece));
                continue;
            }
            if !fitting.is_empty() {
                self.merge(&fitting, out);
                fitting.clear();
            }
            if rest.is_empty() {
                push_trimmed(at, piece, out);
            } else {
                self.split_recursive(piece, at, rest, out);
            }
        }
        if !fitting.is_empty() {
            self.merge(&fitting, out);
        }
    }

    /// `pieces` are adjacent in the document, so every window is one
    /// contiguous span starting at its first piece.
    fn merge(&self, pieces: &[(usize, &str)], out: &mut Vec<Piece>) {
        let ChunkingConfig { chunk_size, chunk_overlap } = self.config;
        let mut window: VecDeque<(usize, &str, usize)> = VecDeque::new();
        let mut total = 0usize;
        for &(at, piece) in pieces {
            let len = char_len(piece);
            if total + len > chunk_size {
                if total > chunk_size {
                    warn!(total, chunk_size, "created a chunk longer than chunk_size");
                }
                if !window.is_empty() {
                    push_window(&window, out);
                    while total > chunk_overlap || (total + len > chunk_size && total > 0) {
                        let Some((_, _, front)) = window.pop_front() else { break };
                        total -= front;
                    }
                }
            }
            window.push_back((at, piece, len));
            total += len;
        }
        push_window(&window, out);
    }
}

/// A chunk's text and the byte offset where it starts in the document.
type Piece = (usize, String);

fn push_trimmed(at: usize, text: &str, out: &mut Vec<Piece>) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        let leading = text.len() - text.trim_start().len();
        out.push((at + leading, trimmed.to_string()));
    }
}

fn push_window(window: &VecDeque<(usize, &str, usize)>, out: &mut Vec<Piece>) {
    let Some(&(at, _, _)) = window.front() else { return };
    let joined: String = window.iter().map(|(_, p, _)| *p).collect();
    push_trimmed(at, &joined, out);
}

/// Record `chunk_index`, `start` (character offset) and the 1-based line
/// range of every chunk. Offsets never decrease, so characters and newlines
/// before each chunk are counted incrementally.
fn attach_positions(text: &str, pieces: Vec<Piece>) -> Vec<Chunk> {
    let mut cursor = 0usize;
    let mut chars_before = 0usize;
    let mut lines_before = 0usize;
    let mut chunks = Vec::with_capacity(pieces.len());
    for (i, (byte_start, piece)) in pieces.into_iter().enumerate() {
        if byte_start > cursor {
            let gap = text.get(cursor..byte_start).unwrap_or_default();
            chars_before += char_len(gap);
            lines_before += gap.matches('\n').count();
            cursor = byte_start;
        }
        let lines_from = lines_before + 1;
        let lines_to = lines_from + piece.matches('\n').count();

        let mut metadata = Meta::new();
        metadata.insert(meta_keys::CHUNK_INDEX.to_string(), MetaValue::from(i));
        metadata.insert(meta_keys::START.to_string(), MetaValue::from(chars_before));
        metadata.insert(meta_keys::LINES_FROM.to_string(), MetaValue::from(lines_from));
        metadata.insert(meta_keys::LINES_TO.to_string(), MetaValue::from(lines_to));
        chunks.push(Chunk { text: piece, metadata });
    }
    chunks
}

/// Convenience wrapper around [`Chunker::split`].
pub fn split(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<Chunk> {
    Chunker::new(ChunkingConfig::new(chunk_size, chunk_overlap)).split(text)
}
