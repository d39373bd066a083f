//! Breadth-first page discovery within a host boundary
//!
//! This module contains the crawl loop that finds the pages of a site:
//! - Maintains the frontier queue and the visited set
//! - Keeps up to the configured number of fetches in flight
//! - Enqueues only links on the seed's host and port
//! - Emits only pages that answered 200 with a body

use crate::crawler::fetcher::{FetchedPage, Fetcher, TransportError};
use crate::crawler::parser::extract_links;
use crate::url::same_authority;
use std::collections::{HashSet, VecDeque};
use tokio::task::JoinSet;
use url::Url;

/// Discovers the reachable pages of a site
pub struct Crawler {
    fetcher: Fetcher,
    max_pages: usize,
    max_concurrent: usize,
}

impl Crawler {
    /// Creates a crawler with a page cap and an in-flight fetch cap
    pub fn new(fetcher: Fetcher, max_pages: usize, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_pages,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Walks the site starting at `seed` and returns every page that
    /// answered 200
    ///
    /// Each URL is claimed for fetching at most once, off-host links are
    /// never enqueued, and no new URLs are claimed once `max_pages` have
    /// been. Pages that fail to fetch or answer non-200 are dropped from the
    /// result but their fetch attempt still counts against the cap.
    pub async fn discover_pages(&self, seed: &Url) -> Vec<Url> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<Url> = VecDeque::new();
        let mut pages: Vec<Url> = Vec::new();
        let mut in_flight: JoinSet<(Url, Result<FetchedPage, TransportError>)> = JoinSet::new();

        visited.insert(seed.to_string());
        frontier.push_back(seed.clone());

        loop {
            // Top up the in-flight set from the frontier
            while in_flight.len() < self.max_concurrent {
                let url = match frontier.pop_front() {
                    Some(url) => url,
                    None => break,
                };
                let fetcher = self.fetcher.clone();
                in_flight.spawn(async move {
                    let result = fetcher.fetch_page(&url).await;
                    (url, result)
                });
            }

            // Frontier drained and nothing in flight means the crawl is done
            let joined = match in_flight.join_next().await {
                Some(joined) => joined,
                None => break,
            };

            let (url, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("Crawl task panicked: {}", e);
                    continue;
                }
            };

            match result {
                Ok(page) if page.status == 200 => {
                    pages.push(url.clone());
                    if pages.len() % 10 == 0 {
                        tracing::info!(
                            "Progress: {} pages discovered, {} queued",
                            pages.len(),
                            frontier.len()
                        );
                    }

                    for link in extract_links(&page.body, &url) {
                        if !same_authority(seed, &link) {
                            tracing::debug!("Skipping off-host link: {}", link);
                            continue;
                        }
                        if visited.len() >= self.max_pages {
                            tracing::debug!("Page cap reached, not queueing {}", link);
                            continue;
                        }
                        if visited.insert(link.to_string()) {
                            frontier.push_back(link);
                        }
                    }
                }
                Ok(page) => {
                    tracing::debug!("Not a page to crawl: {} (status {})", url, page.status);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", url, e);
                }
            }
        }

        pages
    }
}
