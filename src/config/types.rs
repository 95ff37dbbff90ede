use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upstream host serving the topic page and both JSON endpoints
pub const DEFAULT_BASE_URL: &str = "https://bigkinds.or.kr";

/// Desktop browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Transport behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlConfig {
    /// Base URL of the upstream site
    pub base_url: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-request timeout (seconds)
    pub timeout: u64,

    /// Number of attempts per network call, including the first
    pub retry_attempts: u32,

    /// Base backoff delay (seconds); doubles after every failed attempt
    pub retry_delay: f64,

    /// Concurrency hint; stages always run sequentially
    pub max_concurrent_requests: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: 30,
            retry_attempts: 3,
            retry_delay: 1.0,
            max_concurrent_requests: 5,
        }
    }
}

impl CrawlConfig {
    /// Request timeout as a `Duration`
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Base retry delay as a `Duration`
    ///
    /// Values `Duration` cannot represent collapse to zero; validation rejects
    /// them before a client is ever built.
    pub fn retry_delay_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.retry_delay).unwrap_or(Duration::ZERO)
    }

    /// Base URL without a trailing slash, ready for path joining
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Root directory for all crawl output
    pub output_dir: PathBuf,

    /// Write the raw topic page as `topic-list.html`
    pub save_html: bool,

    /// Write stage checkpoints as JSON
    pub save_json: bool,

    /// Nest each run under a filesystem-safe timestamp folder
    pub create_timestamp_folder: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            save_html: true,
            save_json: true,
            create_timestamp_folder: true,
        }
    }
}
