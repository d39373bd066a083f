//! Site-level orchestration
//!
//! `LinkManager` owns the full pipeline: discover pages within the host
//! boundary, scan every page and check its links, build the similarity index
//! from the collected link contexts, and rank repair suggestions for
//! whatever came back broken.

use crate::config::Config;
use crate::crawler::{Crawler, Fetcher, LinkScanner};
use crate::repair::{
    ArchiveProvider, GeminiGenerator, RepairEngine, RepairSuggestion, SuggestionGenerator,
    WaybackClient,
};
use crate::similarity::{HttpEmbedder, IndexEntry, SimilarityIndex, TextEmbedder};
use crate::state::{KnownGoodRegistry, LinkStatus};
use crate::url::normalize_url;
use crate::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Orchestrates crawling, link checking, indexing, and repair for one site
pub struct LinkManager {
    config: Config,
    fetcher: Fetcher,
    index: SimilarityIndex,
    registry: KnownGoodRegistry,
    engine: RepairEngine,
}

impl LinkManager {
    /// Creates a manager with explicit capabilities
    ///
    /// Absent archive or generator capabilities disable those suggestion
    /// sources; the similarity source always runs against the index built by
    /// the most recent scan.
    pub fn new(
        config: Config,
        embedder: Arc<dyn TextEmbedder>,
        archive: Option<Arc<dyn ArchiveProvider>>,
        generator: Option<Arc<dyn SuggestionGenerator>>,
    ) -> crate::Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        let index = SimilarityIndex::new(embedder, config.vector.similarity_threshold);
        let engine = RepairEngine::new(archive, generator, config.repair.similarity_k);

        Ok(Self {
            config,
            fetcher,
            index,
            registry: KnownGoodRegistry::new(),
            engine,
        })
    }

    /// Creates a manager wired from configuration and environment
    ///
    /// `OPENAI_API_KEY` is required for the embedding service. The archive
    /// is consulted when enabled in configuration, and `GEMINI_API_KEY`
    /// switches on generated suggestions when present.
    pub fn from_config(config: Config) -> crate::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Validation(
                "OPENAI_API_KEY must be set for the embedding service".to_string(),
            )
        })?;

        let embedder = HttpEmbedder::new(
            config.vector.embedding_endpoint.clone(),
            api_key,
            config.vector.embedding_model.clone(),
            config.vector.dimension,
            config.vector.batch_size,
        )?;

        let archive: Option<Arc<dyn ArchiveProvider>> = if config.repair.use_archive {
            Some(Arc::new(WaybackClient::new(
                config.repair.archive_endpoint.clone(),
            )?))
        } else {
            None
        };

        let generator: Option<Arc<dyn SuggestionGenerator>> =
            match std::env::var("GEMINI_API_KEY") {
                Ok(key) => Some(Arc::new(GeminiGenerator::new(
                    config.repair.generator_endpoint.clone(),
                    key,
                    config.repair.generator_model.clone(),
                )?)),
                Err(_) => {
                    tracing::warn!("GEMINI_API_KEY is not set; generated suggestions are disabled");
                    None
                }
            };

        Self::new(config, Arc::new(embedder), archive, generator)
    }

    /// Crawls `domain` and checks every link found on its pages
    ///
    /// Returns one status per distinct link URL; a link checked from several
    /// pages keeps the most recent result. The similarity index and the
    /// known-good registry are rebuilt from this crawl, so `repair_link` can
    /// be called for any broken status afterwards.
    pub async fn scan_website(
        &mut self,
        domain: &str,
    ) -> crate::Result<HashMap<String, LinkStatus>> {
        let seed = normalize_url(domain)?;
        self.registry.clear();

        tracing::info!("Scanning {}", seed);

        let crawler = Crawler::new(
            self.fetcher.clone(),
            self.config.crawler.max_pages,
            self.config.crawler.max_concurrent_requests,
        );
        let pages = crawler.discover_pages(&seed).await;
        tracing::info!("Discovered {} pages", pages.len());

        let scanner = LinkScanner::new(self.fetcher.clone());
        let max_concurrent = self.config.crawler.max_concurrent_requests.max(1);

        let mut all_statuses: HashMap<String, LinkStatus> = HashMap::new();
        let mut all_contexts = Vec::new();

        let mut pending = pages.into_iter();
        let mut in_flight = JoinSet::new();

        loop {
            // Keep up to max_concurrent page scans running
            while in_flight.len() < max_concurrent {
                let page = match pending.next() {
                    Some(page) => page,
                    None => break,
                };
                let scanner = scanner.clone();
                in_flight.spawn(async move { scanner.scan_page(&page).await });
            }

            let scan = match in_flight.join_next().await {
                Some(Ok(scan)) => scan,
                Some(Err(e)) => {
                    tracing::warn!("Page scan task failed: {}", e);
                    continue;
                }
                None => break,
            };

            all_statuses.extend(scan.statuses);
            all_contexts.extend(scan.contexts);
        }

        // Embedding services reject empty input, and a context without
        // anchor text can never be matched anyway
        let entries: Vec<IndexEntry> = all_contexts
            .into_iter()
            .filter(|context| !context.text.trim().is_empty())
            .map(IndexEntry::from)
            .collect();

        match self.index.build(entries).await {
            Ok(()) => {
                tracing::info!("Similarity index built with {} entries", self.index.len());
                if let Some(store_path) = &self.config.vector.store_path {
                    if let Err(e) = self.index.save(Path::new(store_path)).await {
                        tracing::warn!("Failed to persist similarity index: {}", e);
                    }
                }
            }
            Err(e) => tracing::warn!("Failed to build similarity index: {}", e),
        }

        self.registry.record_all(all_statuses.values());

        let broken = all_statuses.values().filter(|s| s.is_broken).count();
        tracing::info!("Checked {} links, {} broken", all_statuses.len(), broken);

        Ok(all_statuses)
    }

    /// Ranks repair suggestions for one broken link, best first
    ///
    /// At most `max-suggestions` entries are returned.
    pub async fn repair_link(&self, status: &LinkStatus) -> Vec<RepairSuggestion> {
        let mut suggestions = self
            .engine
            .repair(status, &self.index, &self.registry)
            .await;
        suggestions.truncate(self.config.repair.max_suggestions);
        suggestions
    }

    /// Pages confirmed live by the most recent scan
    pub fn registry(&self) -> &KnownGoodRegistry {
        &self.registry
    }

    /// Similarity index built by the most recent scan
    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }
}
