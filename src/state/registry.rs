//! Known-good link registry
//!
//! Tracks which URLs were confirmed reachable during the current crawl.

use crate::state::LinkStatus;
use std::collections::HashMap;

/// The set of URLs confirmed live in the current crawl
///
/// Owned by the link manager, emptied at the start of every crawl, and read
/// by the repair engine to gate similarity suggestions. Only non-broken
/// statuses are admitted; `record` silently drops broken ones so callers can
/// feed it raw scan output.
#[derive(Debug, Default)]
pub struct KnownGoodRegistry {
    entries: HashMap<String, LinkStatus>,
}

impl KnownGoodRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a status unless it is broken
    pub fn record(&mut self, status: &LinkStatus) {
        if !status.is_broken {
            self.entries.insert(status.url.clone(), status.clone());
        }
    }

    /// Admits every non-broken status from an iterator
    pub fn record_all<'a>(&mut self, statuses: impl IntoIterator<Item = &'a LinkStatus>) {
        for status in statuses {
            self.record(status);
        }
    }

    /// Returns true when the URL was confirmed live this crawl
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Looks up the recorded status for a URL
    pub fn get(&self, url: &str) -> Option<&LinkStatus> {
        self.entries.get(url)
    }

    /// Number of known-good URLs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries; called at the start of a new crawl
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
