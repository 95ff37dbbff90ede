//! Stage orchestrator
//!
//! This module sequences transport calls with the normalizers and writes a
//! checkpoint after every stage:
//! - Topic list → `topic-list.json` (plus raw `topic-list.html`)
//! - News list per topic → `topic-<NN>/news-list.json`
//! - Details per article → `topic-<NN>/news/<news_id>.json`
//!
//! Each stage acquires its own transport session on entry and drops it on
//! exit. Work inside a stage runs strictly one item at a time.

use crate::config::{validate_output_config, CrawlConfig, OutputConfig};
use crate::crawler::fetcher::{date_range, HttpConnector};
use crate::crawler::transport::{Connector, Transport};
use crate::model::{NewsItem, NewsList, Topic, TopicList};
use crate::output::{
    self, create_output_folder, format_duration, load_json_file, save_json_file, save_text_file,
    OutputError,
};
use crate::parser::{parse_news_detail, parse_news_list, parse_topic_list, ItemOutcome};
use crate::state::{Stage, StageState};
use crate::{CrawlError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Look-back window used when none is given
pub const DEFAULT_DAYS_BACK: u32 = 1;

/// Topics processed by the full pipeline when none is given
pub const DEFAULT_MAX_TOPICS: usize = 10;

/// Result of the details stage for one topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsReport {
    pub success_count: usize,
    pub error_count: usize,
    /// The `news/` folder the detail files were written to
    pub output_path: PathBuf,
}

/// News-list stage progress for one topic in a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct TopicProgress {
    pub rank: u32,
    pub topic: String,
    pub state: StageState,
    /// Articles in the written news list (0 unless `state` is `Done`)
    pub news_items: usize,
    pub topic_path: PathBuf,
}

/// Result of a full pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub topic_list: TopicList,
    pub output_path: PathBuf,
    pub topics: Vec<TopicProgress>,
}

impl TopicProgress {
    /// Moves to `to` if the transition is legal; returns false otherwise
    pub fn advance(&mut self, to: StageState) -> bool {
        if !self.state.can_transition_to(to) {
            tracing::warn!(
                "Ignoring illegal state change for topic {}: {} -> {}",
                self.rank,
                self.state,
                to
            );
            return false;
        }

        self.state = to;
        true
    }
}

impl PipelineReport {
    /// Best-ranked completed topic whose `news-list.json` is on disk
    pub fn details_candidate(&self) -> Option<&TopicProgress> {
        self.topics
            .iter()
            .filter(|t| t.state.is_done())
            .find(|t| output::news_list_file(&t.topic_path).is_file())
    }


    /// Number of topics whose news-list stage completed
    pub fn completed(&self) -> usize {
        self.topics.iter().filter(|t| t.state.is_done()).count()
    }

    /// Number of topics whose news-list stage failed
    pub fn failed(&self) -> usize {
        self.topics
            .iter()
            .filter(|t| t.state == StageState::Failed)
            .count()
    }
}

/// Main crawler: one operation per stage plus the full pipeline
pub struct Crawler<C = HttpConnector> {
    connector: C,
    output: OutputConfig,
}

impl Crawler<HttpConnector> {
    /// Creates a crawler that talks to the real upstream over HTTP
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Config` if either configuration is invalid.
    pub fn new(crawl: CrawlConfig, output: OutputConfig) -> Result<Self> {
        validate_output_config(&output)?;
        Ok(Self {
            connector: HttpConnector::new(crawl)?,
            output,
        })
    }
}

impl<C: Connector> Crawler<C> {
    /// Creates a crawler over any transport connector
    pub fn with_connector(connector: C, output: OutputConfig) -> Self {
        Self { connector, output }
    }

    /// Crawls the topic list from the front page
    ///
    /// Returns the topic list and the run's output location.
    pub async fn crawl_topic_list(&self) -> Result<(TopicList, PathBuf)> {
        tracing::info!("Starting {} crawling...", Stage::TopicList);
        let start_time = Instant::now();

        let output_path = create_output_folder(&self.output)?;

        let topic_list = {
            let transport = self.connector.connect().await?;
            let content = transport.fetch_topic_page().await?;

            if self.output.save_html {
                let html_path = output::topic_page_file(&output_path);
                save_text_file(&html_path, &content)?;
                tracing::info!("HTML saved to: {}", html_path.display());
            }

            parse_topic_list(&content)?
        };

        if self.output.save_json {
            let json_path = output::topic_list_file(&output_path);
            save_json_file(&json_path, &topic_list)?;
            tracing::info!("JSON saved to: {}", json_path.display());
        }

        tracing::info!(
            "Topic list crawling completed in {}",
            format_duration(start_time.elapsed())
        );
        tracing::info!("Found {} topics", topic_list.topics.len());

        Ok((topic_list, output_path))
    }

    /// Crawls the news list for one topic into `topic-<NN>/`
    ///
    /// Returns the news list and the topic folder.
    pub async fn crawl_news_list_for_topic(
        &self,
        topic: &Topic,
        output_path: &Path,
        days_back: u32,
    ) -> Result<(NewsList, PathBuf)> {
        tracing::info!("Starting {} crawling for topic: {}", Stage::NewsList, topic.topic);
        let start_time = Instant::now();

        let topic_path = output::topic_folder(output_path, topic.rank);
        std::fs::create_dir_all(&topic_path).map_err(|e| OutputError::io(&topic_path, e))?;

        let news_list = {
            let transport = self.connector.connect().await?;
            let (start_date, end_date) = date_range(days_back)?;
            let response = transport
                .fetch_news_list(&topic.topic, &topic.news_ids, &start_date, &end_date)
                .await?;
            parse_news_list(&response, &topic.topic)?
        };

        if self.output.save_json {
            let json_path = output::news_list_file(&topic_path);
            save_json_file(&json_path, &news_list)?;
            tracing::info!("News list JSON saved to: {}", json_path.display());
        }

        tracing::info!(
            "News list crawling completed in {}",
            format_duration(start_time.elapsed())
        );
        tracing::info!("Found {} news items", news_list.news_list.len());

        Ok((news_list, topic_path))
    }

    /// Crawls the detail of every article in `news_list`, in order
    ///
    /// A failure on one article is counted and logged; the loop always runs to
    /// the end. Only failing to open the session or the output folder aborts.
    pub async fn crawl_news_details(
        &self,
        news_list: &NewsList,
        topic_path: &Path,
    ) -> Result<DetailsReport> {
        let total = news_list.news_list.len();
        tracing::info!("Starting {} crawling for {} items", Stage::NewsDetails, total);
        let start_time = Instant::now();

        let news_path = output::news_folder(topic_path);
        std::fs::create_dir_all(&news_path).map_err(|e| OutputError::io(&news_path, e))?;

        let mut success_count = 0;
        let mut error_count = 0;

        {
            let transport = self.connector.connect().await?;

            for (index, item) in news_list.news_list.iter().enumerate() {
                tracing::debug!(
                    "Processing news item {}/{}: {}",
                    index + 1,
                    total,
                    item.news_id
                );

                match self.crawl_one_detail(&transport, item, &news_path).await {
                    ItemOutcome::Parsed(()) => success_count += 1,
                    ItemOutcome::Skipped => {}
                    ItemOutcome::Errored { reason } => {
                        error_count += 1;
                        tracing::warn!("Failed to process news item {}: {}", item.news_id, reason);
                    }
                }
            }
        }

        tracing::info!(
            "News details crawling completed in {}",
            format_duration(start_time.elapsed())
        );
        tracing::info!("Success: {}, Errors: {}", success_count, error_count);

        Ok(DetailsReport {
            success_count,
            error_count,
            output_path: news_path,
        })
    }

    async fn crawl_one_detail(
        &self,
        transport: &C::Transport,
        item: &NewsItem,
        news_path: &Path,
    ) -> ItemOutcome<()> {
        match self.try_crawl_one_detail(transport, item, news_path).await {
            Ok(()) => ItemOutcome::Parsed(()),
            Err(e) => ItemOutcome::errored(e.to_string()),
        }
    }

    async fn try_crawl_one_detail(
        &self,
        transport: &C::Transport,
        item: &NewsItem,
        news_path: &Path,
    ) -> Result<()> {
        let response = transport.fetch_news_detail(&item.detail_id()).await?;
        let detail = parse_news_detail(&response)?;

        if self.output.save_json {
            save_json_file(&output::detail_file(news_path, &item.news_id), &detail)?;
        }

        Ok(())
    }

    /// Runs the topic-list stage, then the news-list stage for the
    /// `max_topics` best-ranked topics
    ///
    /// A failing topic is logged and recorded as `Failed`; only a failure of
    /// the topic-list stage aborts the run.
    pub async fn crawl_full_pipeline(
        &self,
        max_topics: usize,
        days_back: u32,
    ) -> Result<PipelineReport> {
        tracing::info!("Starting full crawling pipeline for top {} topics", max_topics);
        let start_time = Instant::now();

        let (topic_list, output_path) = match self.crawl_topic_list().await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Full pipeline failed: {}", e);
                return Err(e);
            }
        };

        let selected: Vec<&Topic> = topic_list.ranked().into_iter().take(max_topics).collect();
        let mut progress = Vec::with_capacity(selected.len());

        let mut seen_ranks = HashSet::new();

        for topic in selected {
            // Topics sharing a rank would share a folder
            if !seen_ranks.insert(topic.rank) {
                tracing::warn!(
                    "Skipping topic '{}': rank {} already processed",
                    topic.topic,
                    topic.rank
                );
                continue;
            }

            let mut entry = TopicProgress {
                rank: topic.rank,
                topic: topic.topic.clone(),
                state: StageState::Pending,
                news_items: 0,
                topic_path: output::topic_folder(&output_path, topic.rank),
            };

            match self
                .crawl_news_list_for_topic(topic, &output_path, days_back)
                .await
            {
                Ok((news_list, topic_path)) => {
                    tracing::info!(
                        "Completed topic {}: {} ({} news items)",
                        topic.rank,
                        topic.topic,
                        news_list.news_list.len()
                    );
                    entry.advance(StageState::Done);
                    entry.news_items = news_list.news_list.len();
                    entry.topic_path = topic_path;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to process topic {}: {} - {}",
                        topic.rank,
                        topic.topic,
                        e
                    );
                    entry.advance(StageState::Failed);
                }
            }

            progress.push(entry);
        }

        tracing::info!(
            "Full pipeline completed in {}",
            format_duration(start_time.elapsed())
        );

        Ok(PipelineReport {
            topic_list,
            output_path,
            topics: progress,
        })
    }

    /// Loads a topic-list checkpoint from a run's output location
    ///
    /// # Errors
    ///
    /// * `OutputError::NotFound` - `topic-list.json` is missing
    /// * `OutputError::Validation` - the file does not match the schema
    pub fn load_topic_list(&self, output_path: &Path) -> Result<TopicList> {
        load_topic_list(output_path)
    }

    /// Loads a news-list checkpoint from a topic folder
    ///
    /// # Errors
    ///
    /// * `OutputError::NotFound` - `news-list.json` is missing
    /// * `OutputError::Validation` - the file does not match the schema
    pub fn load_news_list(&self, topic_path: &Path) -> Result<NewsList> {
        load_news_list(topic_path)
    }
}

/// Loads `topic-list.json` from `output_path`
pub fn load_topic_list(output_path: &Path) -> Result<TopicList> {
    let path = output::topic_list_file(output_path);
    let topic_list: TopicList = load_json_file(&path)?;
    topic_list
        .validate()
        .map_err(|message| validation_error(path, message))?;
    Ok(topic_list)
}

/// Loads `news-list.json` from `topic_path`
pub fn load_news_list(topic_path: &Path) -> Result<NewsList> {
    let path = output::news_list_file(topic_path);
    let news_list: NewsList = load_json_file(&path)?;
    news_list
        .validate()
        .map_err(|message| validation_error(path, message))?;
    Ok(news_list)
}

fn validation_error(path: PathBuf, message: String) -> CrawlError {
    CrawlError::Output(OutputError::Validation { path, message })
}
