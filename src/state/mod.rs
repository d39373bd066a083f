//! State module for link records and crawl-session bookkeeping
//!
//! This module defines what the scanner knows about each link and which URLs
//! the current crawl has confirmed live.
//!
//! # Components
//!
//! - `LinkContext`: The textual neighborhood a link was found in
//! - `LinkStatus`: The outcome of checking one link
//! - `KnownGoodRegistry`: URLs confirmed reachable during the current crawl

mod link_status;
mod registry;

// Re-export main types
pub use link_status::{LinkContext, LinkStatus};
pub use registry::KnownGoodRegistry;
