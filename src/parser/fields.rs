//! Alias-tolerant field access on loosely-typed JSON objects
//!
//! Upstream payloads have drifted over time, so every concept is read from an
//! ordered list of accepted field names. The first alias that is present and
//! not `null` wins.

use serde_json::{Map, Value};

pub(crate) const TOPIC_LIST: &[&str] = &["todayIssueTop10"];
pub(crate) const TOPIC_METADATA: &[&str] = &["todayIssueCnt"];
pub(crate) const TOPIC_RANK: &[&str] = &["ROWNUM", "rank"];
pub(crate) const TOPIC_LABEL: &[&str] = &["topic", "TOPIC"];
pub(crate) const TOPIC_KEYWORDS: &[&str] = &["topic_keyword", "keyword"];
pub(crate) const TOPIC_NEWS_IDS: &[&str] = &["news_cluster", "newsCluster"];
pub(crate) const TOPIC_SUMMARY: &[&str] = &["topic_content", "content"];
pub(crate) const TOPIC_ISSUE_NAME: &[&str] = &["topic_origin", "issue_name"];

pub(crate) const NEWS_LIST: &[&str] = &["newsList"];
pub(crate) const NEWS_ID_ECHO: &[&str] = &["newsIds"];
pub(crate) const NEWS_ID: &[&str] = &["news_node_id", "news_id"];
pub(crate) const NEWS_TITLE: &[&str] = &["title"];
pub(crate) const NEWS_PROVIDER: &[&str] = &["provider_name", "provider"];
pub(crate) const NEWS_BYLINE: &[&str] = &["byline"];
pub(crate) const NEWS_DATE: &[&str] = &["published_date", "date"];
pub(crate) const NEWS_SUMMARY: &[&str] = &["summary", "content"];
pub(crate) const NEWS_KEYWORDS: &[&str] = &["inKeyword"];
pub(crate) const NEWS_KEYWORD_LABEL: &[&str] = &["label"];
pub(crate) const NEWS_CATEGORY: &[&str] = &["category"];
pub(crate) const NEWS_URL: &[&str] = &["url"];

pub(crate) const DETAIL: &[&str] = &["detail"];
pub(crate) const DETAIL_CONTENT: &[&str] = &["CONTENT"];
pub(crate) const DETAIL_TITLE: &[&str] = &["TITLE"];
pub(crate) const DETAIL_PROVIDER: &[&str] = &["PROVIDER_NAME", "PROVIDER"];
pub(crate) const DETAIL_BYLINE: &[&str] = &["BYLINE"];
pub(crate) const DETAIL_DATE: &[&str] = &["PUBLISHED_DATE", "DATE"];
pub(crate) const DETAIL_CATEGORY: &[&str] = &["CATEGORY"];
pub(crate) const DETAIL_KEYWORDS: &[&str] = &["KEYWORDS"];
pub(crate) const DETAIL_SUMMARY: &[&str] = &["SUMMARY"];
pub(crate) const DETAIL_URL: &[&str] = &["URL"];

/// Returns the first present, non-null value among the aliases
pub(crate) fn field<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|name| object.get(*name))
        .find(|value| !value.is_null())
}

/// Reads a scalar field as a string, empty when absent
pub(crate) fn string_field(object: &Map<String, Value>, aliases: &[&str]) -> String {
    field(object, aliases).map(scalar_to_string).unwrap_or_default()
}

/// Renders a scalar JSON value as text; structured values keep their JSON form
pub(crate) fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Reads a rank given as a float, an integer or a numeric string, truncating
/// toward zero. Non-positive ranks count as unparsable.
pub(crate) fn rank_value(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !number.is_finite() {
        return None;
    }

    let truncated = number.trunc();
    if truncated < 1.0 || truncated > f64::from(u32::MAX) {
        return None;
    }

    Some(truncated as u32)
}
