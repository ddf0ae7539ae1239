//! ragdoc-vector
//!
//! In-memory store for one vectorized document and cosine-similarity
//! retrieval over it. The store publishes whole `DocumentIndex` snapshots;
//! readers never observe a partially installed document.

pub mod index;
pub mod search;
pub mod store;

pub use index::{DocumentIndex, DocumentInfo, IndexedChunk};
pub use search::{cosine_similarity, retrieve, ScoredChunk};
pub use store::IndexStore;
