//! Per-page link scanning
//!
//! The scanner fetches one page, extracts every anchor with its context, and
//! checks all the targets concurrently. Targets are checked wherever they
//! point; the host boundary only restricts which pages get crawled, not
//! which links get checked.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_link_entries;
use crate::state::{LinkContext, LinkStatus};
use futures::future::join_all;
use std::collections::HashMap;
use url::Url;

/// Everything observed while scanning a single page
#[derive(Debug, Default)]
pub struct PageScan {
    /// Check outcome per target URL; duplicate anchors collapse to the last
    /// check of their shared target
    pub statuses: HashMap<String, LinkStatus>,

    /// Every link context observed, one per anchor occurrence
    pub contexts: Vec<LinkContext>,
}

/// Checks the outbound links of individual pages
#[derive(Clone)]
pub struct LinkScanner {
    fetcher: Fetcher,
}

impl LinkScanner {
    /// Creates a scanner sharing the given fetcher's concurrency budget
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Scans one page: fetches it, extracts its anchors, and checks every
    /// target
    ///
    /// One target's transport failure never aborts the rest of the batch;
    /// every outcome, including failures, lands in the result. A page that
    /// cannot be fetched or answers non-200 yields an empty scan.
    pub async fn scan_page(&self, page: &Url) -> PageScan {
        let body = match self.fetcher.fetch_page(page).await {
            Ok(fetched) if fetched.status == 200 => fetched.body,
            Ok(fetched) => {
                tracing::debug!("Not scanning {} (status {})", page, fetched.status);
                return PageScan::default();
            }
            Err(e) => {
                tracing::warn!("Could not fetch {} for scanning: {}", page, e);
                return PageScan::default();
            }
        };

        let entries = extract_link_entries(&body, page);
        tracing::debug!("Checking {} links on {}", entries.len(), page);

        let contexts: Vec<LinkContext> = entries.iter().map(|e| e.context.clone()).collect();

        let checks = entries.into_iter().map(|entry| {
            let fetcher = self.fetcher.clone();
            async move {
                match fetcher.check_status(&entry.url).await {
                    Ok(code) => LinkStatus::checked(entry.url.to_string(), code, Some(entry.context)),
                    Err(e) => {
                        LinkStatus::failed(entry.url.to_string(), e.to_string(), Some(entry.context))
                    }
                }
            }
        });

        let mut statuses = HashMap::new();
        for status in join_all(checks).await {
            statuses.insert(status.url.clone(), status);
        }

        PageScan { statuses, contexts }
    }
}
