use std::collections::HashMap;

use ragdoc_core::tokenize::Term;

/// Ordered set of unique terms; a term's position is its vector dimension.
///
/// Order is first occurrence when scanning chunks in document order, so the
/// same tokenized chunks always produce the same dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<Term>,
    positions: HashMap<Term, usize>,
}

impl Vocabulary {
    pub fn build(tokenized_chunks: &[Vec<Term>]) -> Self {
        let mut vocab = Self::default();
        for term in tokenized_chunks.iter().flatten() {
            if !vocab.positions.contains_key(term) {
                vocab.positions.insert(term.clone(), vocab.terms.len());
                vocab.terms.push(term.clone());
            }
        }
        vocab
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn position(&self, term: &str) -> Option<usize> { self.positions.get(term).copied() }

    pub fn contains(&self, term: &str) -> bool { self.positions.contains_key(term) }

    pub fn terms(&self) -> &[Term] { &self.terms }
}
