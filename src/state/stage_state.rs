/// Stage and per-stage state definitions for the crawl pipeline
use std::fmt;

/// One step of the pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Topic discovery from the front page
    TopicList,

    /// News-list search for one topic
    NewsList,

    /// Article detail retrieval for one topic's news list
    NewsDetails,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopicList => "topic-list",
            Self::NewsList => "news-list",
            Self::NewsDetails => "news-details",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of one stage for one unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageState {
    /// Not yet attempted
    Pending,

    /// Completed and (if configured) checkpointed
    Done,

    /// Attempted and failed; later units continue
    Failed,
}

impl StageState {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `to` is allowed
    pub fn can_transition_to(&self, to: Self) -> bool {
        matches!((self, to), (Self::Pending, Self::Done) | (Self::Pending, Self::Failed))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
