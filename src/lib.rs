//! BigKinds crawler: trending topics and articles from a news-aggregation site
//!
//! This crate implements a three-stage crawl pipeline (topic discovery, per-topic
//! news lists, per-article details) that persists every stage as JSON on disk so
//! any later stage can be re-run from a previous stage's output.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod parser;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

pub use crawler::FetchError;
pub use output::OutputError;
pub use parser::ParseError;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    Transport {
        operation: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl CrawlError {
    /// Returns true if a checkpoint file expected by a `load_*` operation is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Output(OutputError::NotFound { .. }))
    }

    /// Returns true if a checkpoint file exists but does not match its schema
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Output(OutputError::Validation { .. }))
    }

    /// Path of the checkpoint file involved in a load failure, if any
    pub fn checkpoint_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Output(OutputError::NotFound { path })
            | Self::Output(OutputError::Validation { path, .. }) => Some(path),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig, OutputConfig};
pub use crawler::{Crawler, DetailsReport, PipelineReport, TopicProgress};
pub use model::{NewsDetail, NewsItem, NewsList, Topic, TopicList, TopicListMetadata};
pub use state::{Stage, StageState};
