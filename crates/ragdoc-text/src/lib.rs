//! ragdoc-text
//!
//! Term statistics over the chunks of one document: vocabulary construction
//! and TF-IDF vectorization. See `vocabulary` and `tfidf`.

pub mod tfidf;
pub mod vocabulary;

pub use tfidf::{vectorize, vectorize_against, DocumentVector, IdfWeights, TfIdfVectorizer};
pub use vocabulary::Vocabulary;
