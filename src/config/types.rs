use serde::Deserialize;

/// Main configuration structure for linkmend
///
/// Every section and field has a default, so a missing file or a partial
/// TOML document yields a working configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub vector: VectorConfig,
    pub repair: RepairConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to crawl per site
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum number of in-flight HTTP requests
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,

    /// Total request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Retries per request after a transport failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 1000,
            max_concurrent_requests: 10,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 0,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "linkmend".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/linkmend/linkmend".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// Similarity index configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    /// Embedding vector length; must match what the embedding model produces
    pub dimension: usize,

    /// Maximum L2 distance for a search hit to count as a match
    #[serde(rename = "similarity-threshold")]
    pub similarity_threshold: f32,

    /// Texts embedded per request
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Embedding service endpoint (OpenAI-compatible)
    #[serde(rename = "embedding-endpoint")]
    pub embedding_endpoint: String,

    /// Embedding model name
    #[serde(rename = "embedding-model")]
    pub embedding_model: String,

    /// Where to persist the index between runs; in-memory only when unset
    #[serde(rename = "store-path")]
    pub store_path: Option<String>,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            dimension: 384,
            similarity_threshold: 0.8,
            batch_size: 32,
            embedding_endpoint: "https://api.openai.com/v1/embeddings".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            store_path: None,
        }
    }
}

/// Repair engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Nearest neighbors requested per similarity lookup
    #[serde(rename = "similarity-k")]
    pub similarity_k: usize,

    /// Maximum suggestions reported per broken link
    #[serde(rename = "max-suggestions")]
    pub max_suggestions: usize,

    /// Whether to consult the archive for snapshots
    #[serde(rename = "use-archive")]
    pub use_archive: bool,

    /// Archive availability endpoint
    #[serde(rename = "archive-endpoint")]
    pub archive_endpoint: String,

    /// Generative suggestion endpoint (Gemini-compatible)
    #[serde(rename = "generator-endpoint")]
    pub generator_endpoint: String,

    /// Generative model name
    #[serde(rename = "generator-model")]
    pub generator_model: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            similarity_k: 5,
            max_suggestions: 5,
            use_archive: true,
            archive_endpoint: "http://archive.org/wayback/available".to_string(),
            generator_endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            generator_model: "gemini-pro".to_string(),
        }
    }
}
