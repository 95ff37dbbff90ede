//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file. Every key has a default, so an empty file (or no file) is valid.
//!
//! # Example
//!
//! ```no_run
//! use bigkinds_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Retry attempts: {}", config.crawler.retry_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, OutputConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_crawl_config, validate_output_config};
