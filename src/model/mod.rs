//! Record model for every crawl stage
//!
//! These types are the durable wire format between stages: each stage writes
//! them as JSON and a later process reads them back with the `load_*`
//! operations, so field names and nesting must stay stable.

mod news;
mod topic;

pub use news::{detail_keys, NewsDetail, NewsItem, NewsList};
pub use topic::{Topic, TopicList, TopicListMetadata};

use chrono::{Local, SecondsFormat};

/// Current local time as an ISO-8601 string, used for `extraction_timestamp`
pub fn extraction_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
