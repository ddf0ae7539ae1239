//! TF-IDF weighting over a single document's chunks.
//!
//! - `tf(t, d) = count(t in d) / len(d)` where `len` counts tokens, not unique terms
//! - `idf(t) = ln(|C| / (df(t) + 1))`
//!
//! A term present in every chunk gets a negative IDF; that is kept as-is.

use std::collections::HashMap;

use ragdoc_core::tokenize::{tokenize, Term};
use tracing::debug;

use crate::vocabulary::Vocabulary;

pub type DocumentVector = Vec<f64>;

/// IDF weight per vocabulary position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfWeights {
    weights: Vec<f64>,
    corpus_size: usize,
}

impl IdfWeights {
    pub fn fit(vocabulary: &Vocabulary, corpus: &[Vec<Term>]) -> Self {
        let mut doc_freq = vec![0usize; vocabulary.len()];
        for doc in corpus {
            let mut seen = vec![false; vocabulary.len()];
            for term in doc {
                if let Some(pos) = vocabulary.position(term) {
                    if !seen[pos] {
                        seen[pos] = true;
                        doc_freq[pos] += 1;
                    }
                }
            }
        }
        let n = corpus.len() as f64;
        let weights = doc_freq.iter().map(|&df| (n / (df as f64 + 1.0)).ln()).collect();
        Self { weights, corpus_size: corpus.len() }
    }

    pub fn get(&self, position: usize) -> Option<f64> { self.weights.get(position).copied() }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    pub fn corpus_size(&self) -> usize { self.corpus_size }
}

/// Vectorize already-tokenized `terms`. Terms outside the vocabulary are
/// skipped; an empty term list gives the zero vector.
pub fn vectorize(terms: &[Term], vocabulary: &Vocabulary, idf: &IdfWeights) -> DocumentVector {
    let mut vector = vec![0.0; vocabulary.len()];
    if terms.is_empty() {
        return vector;
    }
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for term in terms {
        if let Some(pos) = vocabulary.position(term) {
            *counts.entry(pos).or_insert(0) += 1;
        }
    }
    let len = terms.len() as f64;
    for (pos, count) in counts {
        let weight = idf.get(pos).unwrap_or(0.0);
        vector[pos] = (count as f64 / len) * weight;
    }
    vector
}

/// Same result as [`vectorize`], computing IDF straight from `corpus`.
pub fn vectorize_against(terms: &[Term], vocabulary: &Vocabulary, corpus: &[Vec<Term>]) -> DocumentVector {
    vectorize(terms, vocabulary, &IdfWeights::fit(vocabulary, corpus))
}

/// Vocabulary plus IDF weights fitted on one document's chunks.
///
/// Chunks and queries must be vectorized with the same fitted instance;
/// vectors from different instances have unrelated dimensions.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    vocabulary: Vocabulary,
    idf: IdfWeights,
}

impl TfIdfVectorizer {
    pub fn fit(tokenized_chunks: &[Vec<Term>]) -> Self {
        let vocabulary = Vocabulary::build(tokenized_chunks);
        let idf = IdfWeights::fit(&vocabulary, tokenized_chunks);
        debug!(terms = vocabulary.len(), chunks = tokenized_chunks.len(), "fitted tf-idf");
        Self { vocabulary, idf }
    }

    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }

    pub fn dimension(&self) -> usize { self.vocabulary.len() }

    pub fn transform(&self, terms: &[Term]) -> DocumentVector {
        vectorize(terms, &self.vocabulary, &self.idf)
    }

    /// Tokenize raw text with the shared tokenizer, then vectorize.
    pub fn transform_text(&self, text: &str) -> DocumentVector {
        self.transform(&tokenize(text))
    }
}
