//! Linkmend: a link-health crawler and repair engine
//!
//! This crate crawls a website within its host boundary, checks the liveness of
//! every link it finds, and produces ranked repair suggestions for the broken
//! ones from archive lookups, similarity matches, and a generative fallback.

pub mod config;
pub mod crawler;
pub mod repair;
pub mod similarity;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for linkmend operations
#[derive(Debug, Error)]
pub enum LinkmendError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Similarity index error: {0}")]
    Index(#[from] IndexError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Similarity index errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Embedding failed: {0}")]
    Embedding(anyhow::Error),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Index and metadata disagree: {vectors} vectors, {entries} entries")]
    MetadataMismatch { vectors: usize, entries: usize },

    #[error("Index I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for linkmend operations
pub type Result<T> = std::result::Result<T, LinkmendError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for similarity index operations
pub type IndexResult<T> = std::result::Result<T, IndexError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, Fetcher, LinkManager, LinkScanner};
pub use repair::{RepairEngine, RepairSuggestion, SuggestionSource};
pub use similarity::{SimilarityIndex, TextEmbedder};
pub use state::{KnownGoodRegistry, LinkContext, LinkStatus};
pub use url::{extract_host, normalize_url, same_authority};
