//! URL handling module for linkmend
//!
//! Normalization fixes page identity (scheme, host, path, and query, with the
//! fragment stripped); the authority check fixes the crawl boundary.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, same_authority};
pub use normalize::normalize_url;
