//! Crawler module for fetching and stage orchestration
//!
//! This module contains the core crawling logic, including:
//! - The HTTP transport with retry/backoff
//! - The transport seam used to inject sessions per stage
//! - Stage orchestration with on-disk checkpoints

mod coordinator;
mod fetcher;
mod retry;
mod transport;

pub use coordinator::{
    load_news_list, load_topic_list, Crawler, DetailsReport, PipelineReport, TopicProgress,
    DEFAULT_DAYS_BACK, DEFAULT_MAX_TOPICS,
};
pub use fetcher::{
    build_http_client, date_range, date_range_from, BigKindsClient, FetchError, HttpConnector,
    NEWS_DETAIL_PATH, NEWS_LIST_PATH,
};
pub use retry::RetryPolicy;
pub use transport::{Connector, Transport};
