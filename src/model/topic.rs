use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One trending subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// 1-based rank, unique within a topic list
    pub rank: u32,

    /// Display text
    pub topic: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub news_count: u32,

    /// Upstream article IDs (hyphenated list-stage form)
    #[serde(default)]
    pub news_ids: Vec<String>,

    #[serde(default)]
    pub issue_name: String,
}

/// Extraction metadata attached to a topic list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicListMetadata {
    /// Localized date phrase from the source page (may be empty)
    #[serde(default)]
    pub extraction_date: String,

    pub extraction_timestamp: String,

    pub total_topics: usize,

    // Upstream counters, echoed verbatim when the page provides them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_count: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_count: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_order: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_datetime: Option<Value>,
}

/// A full crawl snapshot of topics, in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicList {
    pub metadata: TopicListMetadata,
    pub topics: Vec<Topic>,
}

impl TopicList {
    /// Builds a topic list, stamping `total_topics` from the list length
    pub fn new(mut metadata: TopicListMetadata, topics: Vec<Topic>) -> Self {
        metadata.total_topics = topics.len();
        Self { metadata, topics }
    }

    /// Finds a topic by its rank
    pub fn by_rank(&self, rank: u32) -> Option<&Topic> {
        self.topics.iter().find(|t| t.rank == rank)
    }

    /// Topics sorted by rank, without reordering the list itself
    pub fn ranked(&self) -> Vec<&Topic> {
        let mut topics: Vec<&Topic> = self.topics.iter().collect();
        topics.sort_by_key(|t| t.rank);
        topics
    }

    /// Checks the invariants a deserialized checkpoint must satisfy
    pub fn validate(&self) -> Result<(), String> {
        if self.metadata.total_topics != self.topics.len() {
            return Err(format!(
                "metadata.total_topics is {} but {} topics are present",
                self.metadata.total_topics,
                self.topics.len()
            ));
        }

        for topic in &self.topics {
            if topic.rank == 0 {
                return Err(format!("topic '{}' has rank 0", topic.topic));
            }
        }

        Ok(())
    }
}
