//! HTTP transport implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building a cookie-keeping session with the fixed browser headers
//! - Priming the session with a best-effort GET of the base URL
//! - The three upstream endpoints (topic page, news search, news detail)
//! - Retry with exponential backoff around each call
//!
//! TLS certificate validation is disabled: the upstream host serves a chain
//! the client does not validate. Keep this visible if the transport changes.

use crate::config::{validate_crawl_config, CrawlConfig};
use crate::crawler::retry::RetryPolicy;
use crate::crawler::transport::{Connector, Transport};
use crate::{ConfigError, Result};
use chrono::{Days, Local, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::{Client, Response};
use serde_json::Value;
use thiserror::Error;

pub const NEWS_LIST_PATH: &str = "/news/getNetworkDataAnalysis.do";
pub const NEWS_DETAIL_PATH: &str = "/news/detailView.do";

/// Number of results requested from the news search
const RESULT_NO: &str = "100";

const ACCEPT_VALUE: &str = "application/json, text/javascript, */*; q=0.01";
const ACCEPT_LANGUAGE_VALUE: &str = "ko-KR,ko;q=0.9,en;q=0.8";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// A single failed attempt; retried until the policy gives up
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Builds the session client with fixed headers, cookies and relaxed TLS
///
/// # Example
///
/// ```no_run
/// use bigkinds_crawler::config::CrawlConfig;
/// use bigkinds_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> std::result::Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
    if let Ok(referer) = HeaderValue::from_str(&format!("{}/", config.base_url_trimmed())) {
        headers.insert(REFERER, referer);
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout_duration())
        .cookie_store(true)
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Computes the search window: `(today - days_back, today)` as `YYYY-MM-DD`
///
/// # Errors
///
/// Returns `CrawlError::Config` if the window reaches before the earliest
/// representable date.
pub fn date_range(days_back: u32) -> Result<(String, String)> {
    date_range_from(Local::now().date_naive(), days_back)
}

/// [`date_range`] relative to a fixed `today`
pub fn date_range_from(today: NaiveDate, days_back: u32) -> Result<(String, String)> {
    let start = today
        .checked_sub_days(Days::new(u64::from(days_back)))
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "look-back of {} days is out of the supported date range",
                days_back
            ))
        })?;

    Ok((
        start.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string(),
    ))
}

/// HTTP client for the upstream site
#[derive(Debug, Clone)]
pub struct BigKindsClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl BigKindsClient {
    /// Builds a client without touching the network
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            base_url: config.base_url_trimmed().to_string(),
            retry: RetryPolicy::new(config.retry_attempts, config.retry_delay_duration()),
        })
    }

    /// Visits the base URL once to seed cookies and session state
    ///
    /// A single attempt, no retry. Callers decide what to do with a failure;
    /// [`HttpConnector`] logs and discards it.
    pub async fn prime_session(&self) -> std::result::Result<(), FetchError> {
        let url = format!("{}/", self.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .map(|_| ())
            .map_err(|source| FetchError::Request { url, source })
    }

    async fn get_text(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        read_text(check_status(url, response)?, url).await
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        let body = read_text(check_status(url, response)?, url).await?;
        decode_json(url, &body)
    }

    async fn post_form_json(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> std::result::Result<Value, FetchError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(form)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        let body = read_text(check_status(url, response)?, url).await?;
        decode_json(url, &body)
    }
}

fn check_status(url: &str, response: Response) -> std::result::Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

async fn read_text(response: Response, url: &str) -> std::result::Result<String, FetchError> {
    response.text().await.map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })
}

fn decode_json(url: &str, body: &str) -> std::result::Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })
}

impl Transport for BigKindsClient {
    async fn fetch_topic_page(&self) -> Result<String> {
        tracing::info!("Fetching topic list page...");

        let url = self.base_url.clone();
        let body = self
            .retry
            .run("fetch topic page", || self.get_text(&url))
            .await?;

        tracing::info!("Topic list page fetched successfully");
        Ok(body)
    }

    async fn fetch_news_list(
        &self,
        topic: &str,
        news_ids: &[String],
        start_date: &str,
        end_date: &str,
    ) -> Result<Value> {
        tracing::info!("Fetching news list for topic: {}", topic);

        let url = format!("{}{}", self.base_url, NEWS_LIST_PATH);
        let cluster = news_ids.join(",");
        let form = [
            ("pageInfo", "newsResult"),
            ("keyword", topic),
            ("startDate", start_date),
            ("endDate", end_date),
            ("newsCluster", cluster.as_str()),
            ("resultNo", RESULT_NO),
        ];

        let result = self
            .retry
            .run("fetch news list", || self.post_form_json(&url, &form))
            .await?;

        let count = result
            .get("newsList")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        tracing::info!("Fetched {} news items for topic: {}", count, topic);
        Ok(result)
    }

    async fn fetch_news_detail(&self, article_id: &str) -> Result<Value> {
        tracing::debug!("Fetching news detail for ID: {}", article_id);

        let url = format!("{}{}", self.base_url, NEWS_DETAIL_PATH);
        let query = [
            ("docId", article_id),
            ("returnCnt", "1"),
            ("sectionDiv", "1000"),
        ];

        self.retry
            .run("fetch news detail", || self.get_json(&url, &query))
            .await
    }
}

/// Connector that opens a primed HTTP session per stage
#[derive(Debug, Clone)]
pub struct HttpConnector {
    config: CrawlConfig,
}

impl HttpConnector {
    /// Validates the configuration up front
    pub fn new(config: CrawlConfig) -> Result<Self> {
        validate_crawl_config(&config)?;
        Ok(Self { config })
    }
}

impl Connector for HttpConnector {
    type Transport = BigKindsClient;

    async fn connect(&self) -> Result<BigKindsClient> {
        let client = BigKindsClient::new(&self.config)?;

        // Warm-up failures never reach the caller
        if let Err(e) = client.prime_session().await {
            tracing::debug!("Session priming failed, continuing: {}", e);
        }

        Ok(client)
    }
}
