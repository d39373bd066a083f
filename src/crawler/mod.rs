//! Crawler module for page discovery and link checking
//!
//! This module contains the crawl-side logic, including:
//! - HTTP fetching with concurrency limiting and retries
//! - HTML parsing, link resolution, and context extraction
//! - Breadth-first page discovery within the host boundary
//! - Per-page link scanning
//! - Overall scan orchestration

mod discovery;
mod fetcher;
mod manager;
mod parser;
mod scanner;

pub use discovery::Crawler;
pub use fetcher::{build_http_client, FetchedPage, Fetcher, TransportError};
pub use manager::LinkManager;
pub use parser::{extract_link_entries, extract_links, LinkEntry};
pub use scanner::{LinkScanner, PageScan};
