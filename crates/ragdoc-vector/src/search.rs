use tracing::{debug, error};

use ragdoc_core::{Error, Result};

use crate::index::{DocumentIndex, IndexedChunk};

/// A chunk of a snapshot with its similarity to the query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a IndexedChunk,
    pub similarity: f64,
}

/// `dot(a, b) / (|a| * |b|)`, clamped to `[-1, 1]`.
///
/// A zero-magnitude vector on either side has similarity `0.0`.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        error!(left = a.len(), right = b.len(), "cosine similarity on vectors of different dimension");
        return Err(Error::DimensionMismatch { left: a.len(), right: b.len() });
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Ok(0.0);
    }
    Ok((dot / denom).clamp(-1.0, 1.0))
}

/// Rank every chunk of `index` against `query_vector` and keep the best `k`.
///
/// Ties keep document order. `k` larger than the chunk count returns all chunks.
pub fn retrieve<'a>(query_vector: &[f64], index: &'a DocumentIndex, k: usize) -> Result<Vec<ScoredChunk<'a>>> {
    if k == 0 {
        return Err(Error::Configuration("k must be at least 1".to_string()));
    }
    if index.is_empty() {
        return Err(Error::NoDocumentLoaded);
    }
    let mut scored = index
        .chunks()
        .iter()
        .map(|chunk| Ok(ScoredChunk { chunk, similarity: cosine_similarity(query_vector, &chunk.vector)? }))
        .collect::<Result<Vec<_>>>()?;
    // sort_by is stable, so equal scores stay in chunk order
    scored.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    debug!(k, returned = scored.len(), top = scored.first().map(|s| s.similarity), "retrieved chunks");
    Ok(scored)
}
