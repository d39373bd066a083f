//! Repair suggestion pipeline
//!
//! Three independent sources feed one ranked list: archive snapshots,
//! similarity matches against pages confirmed live in the same crawl, and a
//! generative fallback. A failing source is logged and skipped, never fatal,
//! and no source can veto another.
//!
//! # Components
//!
//! - `ArchiveProvider` / `WaybackClient`: snapshot lookups
//! - `SuggestionGenerator` / `GeminiGenerator`: generative fallback
//! - `parse_suggestion_text`: tolerant parsing of generator replies
//! - `RepairEngine`: gathers, scores, and ranks suggestions

mod archive;
mod generator;
mod parser;

// Re-export main types
pub use archive::{ArchiveProvider, WaybackClient};
pub use generator::{GeminiGenerator, SuggestionGenerator};
pub use parser::{
    parse_suggestion_text, usable_suggestions, GeneratedSuggestion, ParseFailure, ParseOutcome,
    DEFAULT_GENERATED_CONFIDENCE,
};

use crate::similarity::SimilarityIndex;
use crate::state::{KnownGoodRegistry, LinkStatus};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Fixed confidence for archive snapshots
const ARCHIVE_CONFIDENCE: f32 = 0.9;

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    /// An archived snapshot of the broken URL itself
    Archive,

    /// A live page whose link context resembles the broken link's
    Similarity,

    /// A generative guess
    Generated,
}

impl fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive => write!(f, "archive"),
            Self::Similarity => write!(f, "similarity"),
            Self::Generated => write!(f, "generated"),
        }
    }
}

/// One ranked repair candidate for a broken link
#[derive(Debug, Clone, Serialize)]
pub struct RepairSuggestion {
    /// The broken URL this suggestion would replace
    pub original_url: String,

    /// Proposed replacement
    pub suggested_url: String,

    /// How strongly the source believes in the replacement
    ///
    /// Archive snapshots are fixed at 0.9 and generated guesses are clamped
    /// to [0, 1]; similarity confidences are 1 minus the L2 distance and may
    /// leave that range for distant matches.
    pub confidence: f32,

    /// Which source produced the suggestion
    pub source: SuggestionSource,

    /// Free-form supporting context
    pub context: String,

    /// L2 distance of the match, for similarity suggestions only
    pub similarity_distance: Option<f32>,
}

/// Gathers and ranks repair suggestions for broken links
pub struct RepairEngine {
    archive: Option<Arc<dyn ArchiveProvider>>,
    generator: Option<Arc<dyn SuggestionGenerator>>,
    similarity_k: usize,
}

impl RepairEngine {
    /// Creates an engine; absent capabilities simply contribute nothing
    pub fn new(
        archive: Option<Arc<dyn ArchiveProvider>>,
        generator: Option<Arc<dyn SuggestionGenerator>>,
        similarity_k: usize,
    ) -> Self {
        Self {
            archive,
            generator,
            similarity_k,
        }
    }

    /// Collects suggestions from every source and sorts them by confidence,
    /// highest first
    ///
    /// The list is neither capped nor deduplicated; the caller applies any
    /// limit. Suggestions from different sources for the same target are a
    /// signal, not a defect.
    pub async fn repair(
        &self,
        broken: &LinkStatus,
        index: &SimilarityIndex,
        registry: &KnownGoodRegistry,
    ) -> Vec<RepairSuggestion> {
        let mut suggestions = Vec::new();

        self.archive_suggestions(broken, &mut suggestions).await;
        self.similarity_suggestions(broken, index, registry, &mut suggestions)
            .await;
        self.generated_suggestions(broken, &mut suggestions).await;

        suggestions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        suggestions
    }

    async fn archive_suggestions(&self, broken: &LinkStatus, out: &mut Vec<RepairSuggestion>) {
        let archive = match &self.archive {
            Some(archive) => archive,
            None => return,
        };

        match archive.lookup(&broken.url).await {
            Ok(Some(snapshot)) => out.push(RepairSuggestion {
                original_url: broken.url.clone(),
                suggested_url: snapshot,
                confidence: ARCHIVE_CONFIDENCE,
                source: SuggestionSource::Archive,
                context: "archived snapshot".to_string(),
                similarity_distance: None,
            }),
            Ok(None) => tracing::debug!("No archive snapshot for {}", broken.url),
            Err(e) => tracing::warn!("Archive lookup failed for {}: {}", broken.url, e),
        }
    }

    async fn similarity_suggestions(
        &self,
        broken: &LinkStatus,
        index: &SimilarityIndex,
        registry: &KnownGoodRegistry,
        out: &mut Vec<RepairSuggestion>,
    ) {
        // Without anchor text there is nothing to match against
        let query = broken.context_text().trim();
        if query.is_empty() {
            return;
        }

        let hits = match index.search(query, self.similarity_k).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("Similarity search failed for {}: {}", broken.url, e);
                return;
            }
        };

        for hit in hits {
            // Only pages confirmed live this crawl are worth suggesting
            if !registry.contains(&hit.metadata.page_url) {
                continue;
            }

            out.push(RepairSuggestion {
                original_url: broken.url.clone(),
                suggested_url: hit.metadata.page_url.clone(),
                confidence: 1.0 - hit.distance,
                source: SuggestionSource::Similarity,
                context: hit.metadata.text.clone(),
                similarity_distance: Some(hit.distance),
            });
        }
    }

    async fn generated_suggestions(&self, broken: &LinkStatus, out: &mut Vec<RepairSuggestion>) {
        let generator = match &self.generator {
            Some(generator) => generator,
            None => return,
        };

        match generator.suggest(&broken.url, broken.context.as_ref()).await {
            Ok(candidates) => {
                for candidate in candidates {
                    out.push(RepairSuggestion {
                        original_url: broken.url.clone(),
                        suggested_url: candidate.url,
                        confidence: candidate.confidence,
                        source: SuggestionSource::Generated,
                        context: candidate.reason,
                        similarity_distance: None,
                    });
                }
            }
            Err(e) => tracing::warn!("Suggestion generator failed for {}: {}", broken.url, e),
        }
    }
}
