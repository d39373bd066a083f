//! Archive snapshot capability
//!
//! Asks an archive whether it holds a snapshot of a URL. The shipped
//! implementation speaks the Wayback Machine availability API.

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Looks up archived snapshots of URLs
#[async_trait]
pub trait ArchiveProvider: Send + Sync {
    /// Returns the snapshot URL when the archive holds one
    async fn lookup(&self, url: &str) -> anyhow::Result<Option<String>>;
}

/// Wayback Machine availability client
pub struct WaybackClient {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<ClosestSnapshot>,
}

#[derive(Deserialize)]
struct ClosestSnapshot {
    url: Option<String>,
}

impl WaybackClient {
    /// Builds a client for the given availability endpoint
    pub fn new(endpoint: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ArchiveProvider for WaybackClient {
    async fn lookup(&self, url: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .context("availability request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("availability endpoint returned {}", status);
        }

        let parsed: AvailabilityResponse = response
            .json()
            .await
            .context("malformed availability response")?;

        Ok(parsed.archived_snapshots.closest.and_then(|c| c.url))
    }
}
