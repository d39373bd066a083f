//! Embedding capability
//!
//! The index only needs something that turns texts into fixed-length
//! vectors. The shipped implementation talks to an OpenAI-compatible
//! `/v1/embeddings` endpoint; tests substitute deterministic stubs.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Produces fixed-dimension vectors for texts
///
/// The dimension must stay constant for the life of the embedder; the
/// similarity index rejects vectors of any other length.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Vector length this embedder produces
    fn dimension(&self) -> usize;

    /// Embeds a batch of texts, one vector per input, in input order
    async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// OpenAI-compatible embeddings client
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    dimension: usize,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    /// Builds a client for the given endpoint and model
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        dimension: usize,
        batch_size: usize,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
            dimension,
            batch_size: batch_size.max(1),
        })
    }
}

#[async_trait]
impl TextEmbedder for HttpEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let request = EmbeddingRequest {
                model: &self.model,
                input: chunk,
                dimensions: self.dimension,
            };

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .context("embedding request failed")?;

            let status = response.status();
            if !status.is_success() {
                return Err(anyhow!("embedding endpoint returned {}", status));
            }

            let parsed: EmbeddingResponse = response
                .json()
                .await
                .context("malformed embedding response")?;

            if parsed.data.len() != chunk.len() {
                return Err(anyhow!(
                    "embedding endpoint returned {} vectors for {} inputs",
                    parsed.data.len(),
                    chunk.len()
                ));
            }
            for data in &parsed.data {
                if data.embedding.len() != self.dimension {
                    return Err(anyhow!(
                        "embedding endpoint returned a {}-dimension vector, expected {}",
                        data.embedding.len(),
                        self.dimension
                    ));
                }
            }

            vectors.extend(parsed.data.into_iter().map(|d| d.embedding));
        }

        Ok(vectors)
    }
}
