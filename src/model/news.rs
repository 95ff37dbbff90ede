use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// One article surfaced by a topic search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Opaque upstream identifier in its hyphenated list-stage form
    pub news_id: String,

    pub title: String,

    #[serde(default)]
    pub provider_name: String,

    #[serde(default)]
    pub byline: String,

    #[serde(default)]
    pub published_date: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub url: String,
}

impl NewsItem {
    /// The dotted ID form the detail endpoint expects
    pub fn detail_id(&self) -> String {
        self.news_id.replace('-', ".")
    }
}

/// Articles found for one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsList {
    pub topic: String,

    pub extraction_timestamp: String,

    /// Upstream-reported count; may exceed `news_list.len()` when items fail to parse
    pub total_news: usize,

    pub news_list: Vec<NewsItem>,

    /// Raw ID echo from upstream
    #[serde(default)]
    pub news_ids: Option<Vec<String>>,
}

impl NewsList {
    /// Checks the invariants a deserialized checkpoint must satisfy
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for item in &self.news_list {
            if !seen.insert(item.news_id.as_str()) {
                return Err(format!("duplicate news_id '{}'", item.news_id));
            }
        }

        if self.total_news < self.news_list.len() {
            return Err(format!(
                "total_news is {} but {} items are present",
                self.total_news,
                self.news_list.len()
            ));
        }

        Ok(())
    }
}

/// Keys of the `NewsDetail::metadata` mapping
pub mod detail_keys {
    pub const TITLE: &str = "title";
    pub const PROVIDER: &str = "provider";
    pub const BYLINE: &str = "byline";
    pub const PUBLISHED_DATE: &str = "published_date";
    pub const CATEGORY: &str = "category";
    pub const KEYWORDS: &str = "keywords";
    pub const SUMMARY: &str = "summary";
    pub const URL: &str = "url";

    pub const ALL: [&str; 8] = [
        TITLE,
        PROVIDER,
        BYLINE,
        PUBLISHED_DATE,
        CATEGORY,
        KEYWORDS,
        SUMMARY,
        URL,
    ];
}

/// Full content of one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDetail {
    pub extraction_timestamp: String,

    /// The upstream `detail` object, verbatim
    #[serde(default)]
    pub news_detail: Option<Value>,

    /// Whitespace-cleaned article body
    #[serde(default)]
    pub content: Option<String>,

    /// Empty when the upstream payload has no detail section
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}
