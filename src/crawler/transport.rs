//! Transport seam between the orchestrator and the network
//!
//! A [`Connector`] hands out one [`Transport`] per stage invocation. The stage
//! owns it for its whole run and drops it on exit, so no two stages ever
//! share a live session and tests can inject a fake per stage.

use crate::Result;
use serde_json::Value;

/// The three upstream operations, each already wrapped in retry/backoff
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// GET the topic page (HTML or JSON body)
    async fn fetch_topic_page(&self) -> Result<String>;

    /// POST a news-list search for one topic
    async fn fetch_news_list(
        &self,
        topic: &str,
        news_ids: &[String],
        start_date: &str,
        end_date: &str,
    ) -> Result<Value>;

    /// GET one article's detail; `article_id` must already be in dotted form
    async fn fetch_news_detail(&self, article_id: &str) -> Result<Value>;
}

/// Acquires a fresh transport session at stage entry
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Transport: Transport;

    async fn connect(&self) -> Result<Self::Transport>;
}
