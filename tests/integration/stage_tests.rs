//! Stage orchestration tests against an in-memory transport
//!
//! The fake connector serves scripted responses and records every call, so
//! these tests can check per-item failure isolation, ID rewriting and the
//! pipeline's ordering without a network.

use bigkinds_crawler::config::OutputConfig;
use bigkinds_crawler::crawler::{load_news_list, load_topic_list, Connector, Transport};
use bigkinds_crawler::{
    CrawlError, Crawler, FetchError, NewsItem, NewsList, Result, StageState,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

#[derive(Default)]
struct Script {
    topic_page: Option<String>,
    news_lists: HashMap<String, Value>,
    details: HashMap<String, Value>,
    fail_connect: bool,

    connects: usize,
    news_calls: Vec<String>,
    detail_calls: Vec<String>,
}

#[derive(Clone, Default)]
struct FakeConnector {
    script: Rc<RefCell<Script>>,
}

struct FakeTransport {
    script: Rc<RefCell<Script>>,
}

fn upstream_error(operation: &str, status: u16) -> CrawlError {
    CrawlError::Transport {
        operation: operation.to_string(),
        attempts: 1,
        source: FetchError::Status {
            url: "http://fake".to_string(),
            status,
        },
    }
}

impl Connector for FakeConnector {
    type Transport = FakeTransport;

    async fn connect(&self) -> Result<FakeTransport> {
        let mut script = self.script.borrow_mut();
        if script.fail_connect {
            return Err(upstream_error("connect", 503));
        }
        script.connects += 1;
        Ok(FakeTransport {
            script: Rc::clone(&self.script),
        })
    }
}

impl Transport for FakeTransport {
    async fn fetch_topic_page(&self) -> Result<String> {
        self.script
            .borrow()
            .topic_page
            .clone()
            .ok_or_else(|| upstream_error("fetch topic page", 500))
    }

    async fn fetch_news_list(
        &self,
        topic: &str,
        _news_ids: &[String],
        _start_date: &str,
        _end_date: &str,
    ) -> Result<Value> {
        let mut script = self.script.borrow_mut();
        script.news_calls.push(topic.to_string());
        script
            .news_lists
            .get(topic)
            .cloned()
            .ok_or_else(|| upstream_error("fetch news list", 500))
    }

    async fn fetch_news_detail(&self, article_id: &str) -> Result<Value> {
        let mut script = self.script.borrow_mut();
        script.detail_calls.push(article_id.to_string());
        script
            .details
            .get(article_id)
            .cloned()
            .ok_or_else(|| upstream_error("fetch news detail", 404))
    }
}

fn output_config(dir: &Path) -> OutputConfig {
    OutputConfig {
        output_dir: dir.to_path_buf(),
        save_html: false,
        save_json: true,
        create_timestamp_folder: false,
    }
}

fn news_item(id: &str) -> NewsItem {
    NewsItem {
        news_id: id.to_string(),
        title: format!("title {}", id),
        provider_name: String::new(),
        byline: String::new(),
        published_date: String::new(),
        summary: String::new(),
        keywords: vec![],
        category: String::new(),
        url: String::new(),
    }
}

fn news_list(ids: &[&str]) -> NewsList {
    NewsList {
        topic: "금리".to_string(),
        extraction_timestamp: "2025-06-20T12:00:00.000000+09:00".to_string(),
        total_news: ids.len(),
        news_list: ids.iter().map(|id| news_item(id)).collect(),
        news_ids: None,
    }
}

fn detail(title: &str) -> Value {
    json!({"detail": {"TITLE": title, "CONTENT": "본문"}})
}

fn topic_page() -> String {
    json!({
        "todayIssueTop10": [
            {"ROWNUM": 2, "topic": "둘째", "news_cluster": "b-1"},
            {"ROWNUM": 1, "topic": "첫째", "news_cluster": "a-1,a-2"},
            {"ROWNUM": 3, "topic": "셋째", "news_cluster": "c-1"}
        ]
    })
    .to_string()
}

fn news_response(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({"news_node_id": id, "title": format!("title {}", id)}))
        .collect();
    json!({"newsList": items})
}

#[tokio::test]
async fn test_details_isolates_failing_item() {
    let connector = FakeConnector::default();
    {
        let mut script = connector.script.borrow_mut();
        for id in ["a.1", "a.2", "a.4", "a.5"] {
            script.details.insert(id.to_string(), detail(id));
        }
    }

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(connector.clone(), output_config(dir.path()));
    let list = news_list(&["a-1", "a-2", "a-3", "a-4", "a-5"]);

    let report = crawler
        .crawl_news_details(&list, dir.path())
        .await
        .unwrap();

    assert_eq!(report.success_count, 4);
    assert_eq!(report.error_count, 1);

    let written = std::fs::read_dir(&report.output_path).unwrap().count();
    assert_eq!(written, 4);
    assert!(report.output_path.join("a-4.json").exists());
    assert!(!report.output_path.join("a-3.json").exists());

    let script = connector.script.borrow();
    assert_eq!(script.detail_calls, vec!["a.1", "a.2", "a.3", "a.4", "a.5"]);
    assert_eq!(script.connects, 1);
}

#[tokio::test]
async fn test_details_counts_malformed_response_as_error() {
    let connector = FakeConnector::default();
    {
        let mut script = connector.script.borrow_mut();
        script.details.insert("x.1".to_string(), json!(["not", "an", "object"]));
        script
            .details
            .insert("x.2".to_string(), json!({"detail": "flat string"}));
        script.details.insert("x.3".to_string(), json!({"detail": null}));
    }

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(connector, output_config(dir.path()));

    let report = crawler
        .crawl_news_details(&news_list(&["x-1", "x-2", "x-3"]), dir.path())
        .await
        .unwrap();

    assert_eq!(report.success_count, 1);
    assert_eq!(report.error_count, 2);

    let saved: Value = serde_json::from_str(
        &std::fs::read_to_string(report.output_path.join("x-3.json")).unwrap(),
    )
    .unwrap();
    assert!(saved["news_detail"].is_null());
    assert!(saved["content"].is_null());
}

#[tokio::test]
async fn test_details_without_json_output_writes_nothing() {
    let connector = FakeConnector::default();
    connector
        .script
        .borrow_mut()
        .details
        .insert("a.1".to_string(), detail("t"));

    let dir = TempDir::new().unwrap();
    let mut output = output_config(dir.path());
    output.save_json = false;
    let crawler = Crawler::with_connector(connector, output);

    let report = crawler
        .crawl_news_details(&news_list(&["a-1"]), dir.path())
        .await
        .unwrap();

    assert_eq!(report.success_count, 1);
    assert_eq!(std::fs::read_dir(&report.output_path).unwrap().count(), 0);
}

#[tokio::test]
async fn test_details_session_failure_aborts_stage() {
    let connector = FakeConnector::default();
    connector.script.borrow_mut().fail_connect = true;

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(connector.clone(), output_config(dir.path()));

    let result = crawler
        .crawl_news_details(&news_list(&["a-1"]), dir.path())
        .await;

    assert!(result.is_err());
    assert!(connector.script.borrow().detail_calls.is_empty());
}

#[tokio::test]
async fn test_pipeline_continues_past_failed_topic() {
    let connector = FakeConnector::default();
    {
        let mut script = connector.script.borrow_mut();
        script.topic_page = Some(topic_page());
        script
            .news_lists
            .insert("첫째".to_string(), news_response(&["a-1", "a-2"]));
        script
            .news_lists
            .insert("셋째".to_string(), news_response(&["c-1"]));
    }

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(connector.clone(), output_config(dir.path()));

    let report = crawler.crawl_full_pipeline(10, 1).await.unwrap();

    let ranks: Vec<u32> = report.topics.iter().map(|t| t.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    let states: Vec<StageState> = report.topics.iter().map(|t| t.state).collect();
    assert_eq!(
        states,
        vec![StageState::Done, StageState::Failed, StageState::Done]
    );
    assert_eq!(report.topics[0].news_items, 2);
    assert_eq!(report.topics[2].news_items, 1);

    // The topic list itself keeps source order
    assert_eq!(report.topic_list.topics[0].topic, "둘째");

    let script = connector.script.borrow();
    assert_eq!(script.news_calls, vec!["첫째", "둘째", "셋째"]);
    assert_eq!(script.connects, 4);

    assert!(dir.path().join("topic-01").join("news-list.json").exists());
    assert!(!dir.path().join("topic-02").join("news-list.json").exists());
    assert!(dir.path().join("topic-03").join("news-list.json").exists());
}

#[tokio::test]
async fn test_pipeline_aborts_when_topic_stage_fails() {
    let connector = FakeConnector::default();

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(connector.clone(), output_config(dir.path()));

    let result = crawler.crawl_full_pipeline(10, 1).await;

    assert!(matches!(result, Err(CrawlError::Transport { .. })));
    assert!(connector.script.borrow().news_calls.is_empty());
}

#[tokio::test]
async fn test_pipeline_rejects_malformed_topic_json() {
    let connector = FakeConnector::default();
    connector.script.borrow_mut().topic_page = Some("{\"todayIssueTop10\": [".to_string());

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(connector, output_config(dir.path()));

    let result = crawler.crawl_full_pipeline(10, 1).await;

    assert!(matches!(result, Err(CrawlError::Parse(_))));
}

#[tokio::test]
async fn test_stages_resume_from_checkpoints() {
    let connector = FakeConnector::default();
    {
        let mut script = connector.script.borrow_mut();
        script.topic_page = Some(topic_page());
        script
            .news_lists
            .insert("첫째".to_string(), news_response(&["a-1", "a-2"]));
        script.details.insert("a.1".to_string(), detail("one"));
        script.details.insert("a.2".to_string(), detail("two"));
    }

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(connector, output_config(dir.path()));

    let (topic_list, output_path) = crawler.crawl_topic_list().await.unwrap();

    // Later stages work only from what is on disk
    let loaded_topics = load_topic_list(&output_path).unwrap();
    assert_eq!(loaded_topics, topic_list);

    let first = loaded_topics.by_rank(1).unwrap();
    let (news, topic_path) = crawler
        .crawl_news_list_for_topic(first, &output_path, 1)
        .await
        .unwrap();

    let loaded_news = load_news_list(&topic_path).unwrap();
    assert_eq!(loaded_news, news);

    let report = crawler
        .crawl_news_details(&loaded_news, &topic_path)
        .await
        .unwrap();
    assert_eq!(report.success_count, 2);
    assert_eq!(report.error_count, 0);
    assert!(topic_path.join("news").join("a-2.json").exists());
}

#[tokio::test]
async fn test_load_missing_checkpoint_is_not_found() {
    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(FakeConnector::default(), output_config(dir.path()));

    let err = crawler.load_news_list(dir.path()).unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_validation());
}

#[tokio::test]
async fn test_pipeline_skips_topics_sharing_a_rank() {
    let connector = FakeConnector::default();
    {
        let mut script = connector.script.borrow_mut();
        // Neither item carries a rank, so both fall back to 1
        script.topic_page = Some(
            json!({
                "todayIssueTop10": [
                    {"topic": "앞", "news_cluster": "a-1"},
                    {"topic": "뒤", "news_cluster": "b-1"}
                ]
            })
            .to_string(),
        );
        script
            .news_lists
            .insert("앞".to_string(), news_response(&["a-1"]));
        script
            .news_lists
            .insert("뒤".to_string(), news_response(&["b-1", "b-2"]));
    }

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::with_connector(connector.clone(), output_config(dir.path()));

    let report = crawler.crawl_full_pipeline(10, 1).await.unwrap();

    assert_eq!(report.topic_list.topics.len(), 2);
    assert_eq!(report.topics.len(), 1);
    assert_eq!(report.topics[0].topic, "앞");
    assert_eq!(connector.script.borrow().news_calls, vec!["앞"]);

    let written = load_news_list(&dir.path().join("topic-01")).unwrap();
    assert_eq!(written.topic, "앞");
}

#[tokio::test]
async fn test_pipeline_without_json_has_no_details_candidate() {
    let connector = FakeConnector::default();
    {
        let mut script = connector.script.borrow_mut();
        script.topic_page = Some(topic_page());
        script
            .news_lists
            .insert("첫째".to_string(), news_response(&["a-1"]));
    }

    let dir = TempDir::new().unwrap();
    let mut output = output_config(dir.path());
    output.save_json = false;
    let crawler = Crawler::with_connector(connector, output);

    let report = crawler.crawl_full_pipeline(10, 1).await.unwrap();

    assert_eq!(report.topics[0].state, StageState::Done);
    assert!(report.details_candidate().is_none());
}
