use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use ragdoc_core::config::{RetrievalConfig, MAX_K};
use ragdoc_core::traits::Generator;
use ragdoc_core::types::{QueryAnswer, QueryResult, RankedPassage};
use ragdoc_core::{Error, Result};
use ragdoc_llm::redact::redact_secrets;
use ragdoc_vector::{retrieve, IndexStore};

/// Upper bound for backend error text surfaced to callers.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 300;

pub struct QueryPipeline {
    store: Arc<IndexStore>,
    generator: Arc<dyn Generator>,
    retrieval: RetrievalConfig,
}

impl QueryPipeline {
    /// `retrieval` is clamped so that `1 <= default_k <= max_k <= MAX_K`.
    pub fn new(store: Arc<IndexStore>, generator: Arc<dyn Generator>, retrieval: RetrievalConfig) -> Self {
        let max_k = retrieval.max_k.clamp(1, MAX_K);
        let clamped = RetrievalConfig { max_k, default_k: retrieval.default_k.clamp(1, max_k) };
        if clamped != retrieval {
            warn!(
                requested_max_k = retrieval.max_k,
                requested_default_k = retrieval.default_k,
                max_k = clamped.max_k,
                default_k = clamped.default_k,
                "retrieval settings out of range, clamped"
            );
        }
        Self { store, generator, retrieval: clamped }
    }

    pub fn default_k(&self) -> usize {
        self.retrieval.default_k
    }

    /// Rank the active document's chunks against `query`.
    ///
    /// Works on a single snapshot of the store for its whole duration.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<QueryResult> {
        if !(1..=self.retrieval.max_k).contains(&k) {
            return Err(Error::Configuration(format!("k must be within 1..={}, got {k}", self.retrieval.max_k)));
        }
        if query.trim().is_empty() {
            return Err(Error::EmptyInput("query is blank".to_string()));
        }
        let snapshot = self.store.snapshot().ok_or(Error::NoDocumentLoaded)?;

        let query_vector = snapshot.vectorizer().transform_text(query);
        let ranked_passages = retrieve(&query_vector, &snapshot, k)?
            .into_iter()
            .map(|scored| RankedPassage {
                content: scored.chunk.chunk.text.clone(),
                similarity: scored.similarity,
                metadata: scored.chunk.chunk.metadata.clone(),
            })
            .collect::<Vec<_>>();
        debug!(file = snapshot.file_name(), k, returned = ranked_passages.len(), "query retrieved");

        Ok(QueryResult { query: query.to_string(), ranked_passages, file_name: snapshot.file_name().to_string() })
    }

    /// Generate an answer from already retrieved passages.
    pub async fn answer(&self, result: &QueryResult) -> Result<String> {
        let start = Instant::now();
        let passages = result.passage_texts();
        match self.generator.generate(&result.query, &passages).await {
            Ok(answer) => {
                info!(
                    backend = self.generator.id(),
                    passages = passages.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "answer generated"
                );
                Ok(answer)
            }
            Err(e) => {
                let message = sanitize_message(&format!("{e:#}"));
                warn!(backend = self.generator.id(), error = %message, "generation failed");
                Err(Error::Generation(message))
            }
        }
    }

    /// `retrieve` followed by `answer`.
    pub async fn ask(&self, query: &str, k: usize) -> Result<QueryAnswer> {
        let result = self.retrieve(query, k)?;
        let generated_answer = self.answer(&result).await?;
        Ok(QueryAnswer {
            query: result.query,
            ranked_passages: result.ranked_passages,
            generated_answer,
            file_name: result.file_name,
        })
    }
}

/// Single-line message of at most [`MAX_ERROR_MESSAGE_CHARS`] characters
/// with key-shaped tokens masked.
pub fn sanitize_message(raw: &str) -> String {
    let flattened = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let masked = redact_secrets(&flattened);
    match masked.char_indices().nth(MAX_ERROR_MESSAGE_CHARS) {
        Some((cut, _)) => masked[..cut].to_string(),
        None => masked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_flattens_and_truncates() {
        assert_eq!(sanitize_message("backend\n  said   no"), "backend said no");
        let long = "x".repeat(1000);
        assert_eq!(sanitize_message(&long).chars().count(), MAX_ERROR_MESSAGE_CHARS);
    }

    #[test]
    fn sanitize_masks_tokens() {
        assert_eq!(sanitize_message("invalid token hf_abcdef"), "invalid token [redacted]");
    }

    #[test]
    fn sanitize_masks_quoted_and_embedded_keys() {
        assert_eq!(
            sanitize_message("Invalid credentials 'hf_SECRETKEY' for model"),
            "Invalid credentials '[redacted]' for model"
        );
        assert_eq!(
            sanitize_message("Authorization=Bearer:hf_SECRETKEY rejected"),
            "Authorization=Bearer:[redacted] rejected"
        );
        assert_eq!(sanitize_message("bad key sk-SECRETKEY"), "bad key [redacted]");
        assert_eq!(sanitize_message("a task-based sk-1 note"), "a task-based sk-1 note");
    }
}
