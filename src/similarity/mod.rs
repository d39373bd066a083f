//! Similarity indexing over link contexts
//!
//! Anchor texts get embedded into fixed-dimension vectors; broken links are
//! later matched against them by L2 distance to find live pages that talk
//! about the same thing.
//!
//! # Components
//!
//! - `TextEmbedder`: The embedding capability, with an HTTP implementation
//! - `SimilarityIndex`: Flat vector index with save/load persistence

mod embedder;
mod index;

// Re-export main types
pub use embedder::{HttpEmbedder, TextEmbedder};
pub use index::{IndexEntry, SearchHit, SimilarityIndex};
