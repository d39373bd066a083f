//! Shared test doubles for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use linkmend::repair::{ArchiveProvider, GeneratedSuggestion, SuggestionGenerator};
use linkmend::similarity::TextEmbedder;
use linkmend::state::LinkContext;

/// Deterministic embedder: numeric strings land at their value on the first
/// axis, anything else at its character count on the last, so all distances
/// are predictable without a model.
pub struct StubEmbedder;

#[async_trait]
impl TextEmbedder for StubEmbedder {
    fn dimension(&self) -> usize {
        4
    }

    async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| match text.trim().parse::<f32>() {
                Ok(value) => vec![value, 0.0, 0.0, 0.0],
                Err(_) => vec![0.0, 0.0, 0.0, text.chars().count() as f32],
            })
            .collect())
    }
}

/// Archive stub with a fixed answer
pub struct StubArchive {
    pub snapshot: Option<String>,
    pub fail: bool,
}

#[async_trait]
impl ArchiveProvider for StubArchive {
    async fn lookup(&self, _url: &str) -> anyhow::Result<Option<String>> {
        if self.fail {
            anyhow::bail!("archive offline");
        }
        Ok(self.snapshot.clone())
    }
}

/// Generator stub with canned suggestions
pub struct StubGenerator {
    pub suggestions: Vec<GeneratedSuggestion>,
    pub fail: bool,
}

#[async_trait]
impl SuggestionGenerator for StubGenerator {
    async fn suggest(
        &self,
        _broken_url: &str,
        _context: Option<&LinkContext>,
    ) -> anyhow::Result<Vec<GeneratedSuggestion>> {
        if self.fail {
            anyhow::bail!("generator offline");
        }
        Ok(self.suggestions.clone())
    }
}
