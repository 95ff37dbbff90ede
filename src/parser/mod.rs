//! Response normalizers
//!
//! This module turns raw upstream payloads into the record model:
//! - Topic pages, as HTML markup or a JSON API body (auto-detected)
//! - News-list search responses
//! - News-detail responses
//!
//! Every normalizer tolerates missing optional fields. Only a structurally
//! invalid document is an error; a single bad entry is logged and skipped.

mod detail;
mod fields;
mod news;
mod text;
mod topics;

pub use detail::parse_news_detail;
pub use news::parse_news_list;
pub use text::{clean_text, split_list, unescape_html};
pub use topics::{is_json_content, parse_html_topic_list, parse_json_topic_list, parse_topic_list};

use thiserror::Error;

/// Errors for payloads that cannot be normalized at all
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unexpected document shape: {0}")]
    UnexpectedShape(String),
}

/// Outcome of normalizing one entry inside a larger payload
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<T> {
    /// The entry produced a record
    Parsed(T),

    /// The entry was intentionally ignored (empty, duplicate, unlabeled)
    Skipped,

    /// The entry could not be normalized
    Errored { reason: String },
}

impl<T> ItemOutcome<T> {
    /// Creates an errored outcome
    pub fn errored(reason: impl Into<String>) -> Self {
        Self::Errored {
            reason: reason.into(),
        }
    }
}

/// Collects parsed records, logging a warning for every errored entry
pub(crate) fn collect_outcomes<T>(
    kind: &str,
    outcomes: impl IntoIterator<Item = ItemOutcome<T>>,
) -> Vec<T> {
    let mut records = Vec::new();

    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            ItemOutcome::Parsed(record) => records.push(record),
            ItemOutcome::Skipped => {
                tracing::debug!("Skipped {} at index {}", kind, index);
            }
            ItemOutcome::Errored { reason } => {
                tracing::warn!("Failed to parse {} at index {}: {}", kind, index, reason);
            }
        }
    }

    records
}
