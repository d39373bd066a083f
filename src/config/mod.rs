//! Configuration module for linkmend
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so the tool also runs without a file.
//!
//! # Example
//!
//! ```no_run
//! use linkmend::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, RepairConfig, UserAgentConfig, VectorConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
