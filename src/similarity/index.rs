//! Flat L2 index over link contexts
//!
//! Brute-force nearest-neighbor search: every vector is compared against the
//! query. Vectors and their metadata live in two parallel lists that every
//! operation keeps the same length, and persistence writes them as a pair of
//! blobs that must load together.

use crate::similarity::embedder::TextEmbedder;
use crate::state::LinkContext;
use crate::{IndexError, IndexResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One indexable unit: the text that gets embedded plus its metadata
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Text to embed
    pub text: String,

    /// Context returned on a search hit
    pub metadata: LinkContext,
}

impl From<LinkContext> for IndexEntry {
    fn from(context: LinkContext) -> Self {
        Self {
            text: context.text.clone(),
            metadata: context,
        }
    }
}

/// A search result: stored metadata and its L2 distance from the query
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Context of the matched entry
    pub metadata: LinkContext,

    /// Euclidean distance to the query embedding; smaller is closer
    pub distance: f32,
}

/// Serialized form of the vector table (the `.index` blob)
#[derive(Serialize, Deserialize)]
struct VectorBlob {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

/// Brute-force similarity index over context embeddings
pub struct SimilarityIndex {
    embedder: Arc<dyn TextEmbedder>,
    threshold: f32,
    vectors: Vec<Vec<f32>>,
    entries: Vec<LinkContext>,
}

impl SimilarityIndex {
    /// Creates an empty index
    ///
    /// `threshold` is the largest distance a search hit may have.
    pub fn new(embedder: Arc<dyn TextEmbedder>, threshold: f32) -> Self {
        Self {
            embedder,
            threshold,
            vectors: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the index contents with fresh embeddings of `entries`
    pub async fn build(&mut self, entries: Vec<IndexEntry>) -> IndexResult<()> {
        let (vectors, metadata) = self.embed_entries(entries).await?;
        self.vectors = vectors;
        self.entries = metadata;
        Ok(())
    }

    /// Appends entries without touching what is already stored
    ///
    /// On an empty index this is equivalent to a first build.
    pub async fn add(&mut self, entries: Vec<IndexEntry>) -> IndexResult<()> {
        let (vectors, metadata) = self.embed_entries(entries).await?;
        self.vectors.extend(vectors);
        self.entries.extend(metadata);
        Ok(())
    }

    /// Returns up to `k` nearest entries within the distance threshold,
    /// closest first
    pub async fn search(&self, query: &str, k: usize) -> IndexResult<Vec<SearchHit>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embed_query(query).await?;

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .zip(self.entries.iter())
            .map(|(vector, entry)| SearchHit {
                metadata: entry.clone(),
                distance: l2_distance(&query_vector, vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.retain(|hit| hit.distance <= self.threshold);
        hits.truncate(k);

        Ok(hits)
    }

    /// Runs `search` for each query independently
    pub async fn batch_search(&self, queries: &[String], k: usize) -> IndexResult<Vec<Vec<SearchHit>>> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(self.search(query, k).await?);
        }
        Ok(results)
    }

    /// Writes the vector table and metadata list side by side
    ///
    /// Produces `<path>.index` and `<path>.meta`; both must be present and
    /// consistent to load again.
    pub async fn save(&self, path: &Path) -> IndexResult<()> {
        let blob = VectorBlob {
            dimension: self.embedder.dimension(),
            vectors: self.vectors.clone(),
        };
        let index_json = serde_json::to_string(&blob)?;
        let meta_json = serde_json::to_string(&self.entries)?;

        tokio::fs::write(sibling(path, ".index"), index_json).await?;
        tokio::fs::write(sibling(path, ".meta"), meta_json).await?;
        Ok(())
    }

    /// Replaces the index contents from a saved pair of blobs
    ///
    /// Fails when the blobs disagree in length or were written for a
    /// different embedding dimension, leaving the current contents untouched.
    pub async fn load(&mut self, path: &Path) -> IndexResult<()> {
        let index_json = tokio::fs::read_to_string(sibling(path, ".index")).await?;
        let meta_json = tokio::fs::read_to_string(sibling(path, ".meta")).await?;

        let blob: VectorBlob = serde_json::from_str(&index_json)?;
        let entries: Vec<LinkContext> = serde_json::from_str(&meta_json)?;

        if blob.vectors.len() != entries.len() {
            return Err(IndexError::MetadataMismatch {
                vectors: blob.vectors.len(),
                entries: entries.len(),
            });
        }

        let expected = self.embedder.dimension();
        if blob.dimension != expected {
            return Err(IndexError::Dimension {
                expected,
                actual: blob.dimension,
            });
        }
        for vector in &blob.vectors {
            self.check_dimension(vector)?;
        }

        self.vectors = blob.vectors;
        self.entries = entries;
        Ok(())
    }

    async fn embed_entries(
        &self,
        entries: Vec<IndexEntry>,
    ) -> IndexResult<(Vec<Vec<f32>>, Vec<LinkContext>)> {
        let texts: Vec<String> = entries.iter().map(|e| e.text.clone()).collect();
        let vectors = self
            .embedder
            .embed(&texts)
            .await
            .map_err(IndexError::Embedding)?;

        if vectors.len() != entries.len() {
            return Err(IndexError::Embedding(anyhow::anyhow!(
                "embedder returned {} vectors for {} entries",
                vectors.len(),
                entries.len()
            )));
        }
        for vector in &vectors {
            self.check_dimension(vector)?;
        }

        let metadata = entries.into_iter().map(|e| e.metadata).collect();
        Ok((vectors, metadata))
    }

    async fn embed_query(&self, query: &str) -> IndexResult<Vec<f32>> {
        let texts = vec![query.to_string()];
        let mut vectors = self
            .embedder
            .embed(&texts)
            .await
            .map_err(IndexError::Embedding)?;

        if vectors.len() != 1 {
            return Err(IndexError::Embedding(anyhow::anyhow!(
                "embedder returned {} vectors for a single query",
                vectors.len()
            )));
        }

        let vector = vectors.remove(0);
        self.check_dimension(&vector)?;
        Ok(vector)
    }

    fn check_dimension(&self, vector: &[f32]) -> IndexResult<()> {
        let expected = self.embedder.dimension();
        if vector.len() != expected {
            return Err(IndexError::Dimension {
                expected,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

/// Euclidean distance between two vectors of equal length
fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Appends a suffix to a path without replacing its extension
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Embeds numeric strings at their value on the first axis, so tests can
    /// dictate exact distances
    struct NumericEmbedder;

    #[async_trait]
    impl TextEmbedder for NumericEmbedder {
        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let value: f32 = t.trim().parse().unwrap_or(1000.0);
                    vec![value, 0.0, 0.0, 0.0]
                })
                .collect())
        }
    }

    /// Claims dimension 4 but produces 3-length vectors
    struct LyingEmbedder;

    #[async_trait]
    impl TextEmbedder for LyingEmbedder {
        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0, 0.0, 0.0]).collect())
        }
    }

    fn entry(text: &str, page_url: &str) -> IndexEntry {
        IndexEntry {
            text: text.to_string(),
            metadata: LinkContext {
                text: text.to_string(),
                page_url: page_url.to_string(),
                ..Default::default()
            },
        }
    }

    fn numeric_index(threshold: f32) -> SimilarityIndex {
        SimilarityIndex::new(Arc::new(NumericEmbedder), threshold)
    }

    #[test]
    fn test_l2_distance() {
        assert_eq!(l2_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(l2_distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_orders_by_distance() {
        let mut index = numeric_index(10.0);
        index
            .build(vec![
                entry("5.0", "https://a.test/far"),
                entry("0.5", "https://a.test/near"),
                entry("2.0", "https://a.test/mid"),
            ])
            .await
            .unwrap();

        let hits = index.search("0.0", 10).await.unwrap();
        let pages: Vec<&str> = hits.iter().map(|h| h.metadata.page_url.as_str()).collect();

        assert_eq!(
            pages,
            vec!["https://a.test/near", "https://a.test/mid", "https://a.test/far"]
        );
        assert_eq!(hits[0].distance, 0.5);
    }

    #[tokio::test]
    async fn test_search_filters_by_threshold() {
        let mut index = numeric_index(1.0);
        index
            .build(vec![
                entry("0.0", "https://a.test/exact"),
                entry("0.9", "https://a.test/close"),
                entry("3.0", "https://a.test/far"),
            ])
            .await
            .unwrap();

        let hits = index.search("0.0", 10).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.distance <= 1.0));
    }

    #[tokio::test]
    async fn test_search_truncates_to_k() {
        let mut index = numeric_index(10.0);
        index
            .build(vec![entry("0.1", "a"), entry("0.2", "b"), entry("0.3", "c")])
            .await
            .unwrap();

        let hits = index.search("0.0", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].metadata.page_url, "a");
    }

    #[tokio::test]
    async fn test_search_empty_index() {
        let index = numeric_index(1.0);
        let hits = index.search("0.0", 5).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_add_on_empty_index_builds() {
        let mut index = numeric_index(10.0);
        index.add(vec![entry("1.0", "a")]).await.unwrap();

        assert_eq!(index.len(), 1);
        let hits = index.search("1.0", 1).await.unwrap();
        assert_eq!(hits[0].distance, 0.0);
    }

    #[tokio::test]
    async fn test_add_appends_after_build() {
        let mut index = numeric_index(10.0);
        index.build(vec![entry("1.0", "a")]).await.unwrap();
        index.add(vec![entry("2.0", "b")]).await.unwrap();

        assert_eq!(index.len(), 2);
        let hits = index.search("2.0", 1).await.unwrap();
        assert_eq!(hits[0].metadata.page_url, "b");
    }

    #[tokio::test]
    async fn test_build_replaces_contents() {
        let mut index = numeric_index(10.0);
        index.build(vec![entry("1.0", "a")]).await.unwrap();
        index.build(vec![entry("2.0", "b")]).await.unwrap();

        assert_eq!(index.len(), 1);
        let hits = index.search("2.0", 5).await.unwrap();
        assert_eq!(hits[0].metadata.page_url, "b");
    }

    #[tokio::test]
    async fn test_batch_search_is_per_query() {
        let mut index = numeric_index(0.5);
        index
            .build(vec![entry("0.0", "zero"), entry("5.0", "five")])
            .await
            .unwrap();

        let queries = vec!["0.0".to_string(), "5.0".to_string(), "100.0".to_string()];
        let results = index.batch_search(&queries, 3).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0][0].metadata.page_url, "zero");
        assert_eq!(results[1][0].metadata.page_url, "five");
        assert!(results[2].is_empty());
    }

    #[tokio::test]
    async fn test_wrong_dimension_rejected() {
        let mut index = SimilarityIndex::new(Arc::new(LyingEmbedder), 1.0);
        let result = index.build(vec![entry("0.0", "a")]).await;

        assert!(matches!(
            result.unwrap_err(),
            IndexError::Dimension { expected: 4, actual: 3 }
        ));
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contexts");

        let mut index = numeric_index(10.0);
        index
            .build(vec![entry("1.0", "https://a.test/x"), entry("4.0", "https://a.test/y")])
            .await
            .unwrap();
        index.save(&path).await.unwrap();

        let mut restored = numeric_index(10.0);
        restored.load(&path).await.unwrap();

        assert_eq!(restored.len(), 2);
        let hits = restored.search("4.0", 1).await.unwrap();
        assert_eq!(hits[0].metadata.page_url, "https://a.test/y");
        assert_eq!(hits[0].distance, 0.0);
    }

    #[tokio::test]
    async fn test_load_rejects_mismatched_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contexts");

        let mut index = numeric_index(10.0);
        index.build(vec![entry("1.0", "a")]).await.unwrap();
        index.save(&path).await.unwrap();

        // Truncate the metadata blob so the pair disagrees
        tokio::fs::write(path.with_file_name("contexts.meta"), "[]")
            .await
            .unwrap();

        let mut restored = numeric_index(10.0);
        let result = restored.load(&path).await;
        assert!(matches!(
            result.unwrap_err(),
            IndexError::MetadataMismatch { vectors: 1, entries: 0 }
        ));
    }

    #[tokio::test]
    async fn test_load_missing_files_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = numeric_index(1.0);
        let result = index.load(&dir.path().join("absent")).await;
        assert!(matches!(result.unwrap_err(), IndexError::Io(_)));
    }
}
