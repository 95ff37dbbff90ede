//! News-list search response normalizer

use crate::model::{extraction_timestamp, NewsItem, NewsList};
use crate::parser::fields::{self, field, string_field};
use crate::parser::text::clean_text;
use crate::parser::{collect_outcomes, ItemOutcome, ParseError};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Parses a news-list search response for one topic
///
/// `total_news` is the length of the upstream array *before* individual items
/// are discarded, so it can exceed `news_list.len()`. Consumers rely on it as
/// the upstream-reported count.
///
/// # Errors
///
/// Returns `ParseError::UnexpectedShape` if the response is not a JSON object.
pub fn parse_news_list(response: &Value, topic: &str) -> Result<NewsList, ParseError> {
    tracing::info!("Parsing news list for topic: {}", topic);

    let object = response.as_object().ok_or_else(|| {
        ParseError::UnexpectedShape("news list response is not a JSON object".to_string())
    })?;

    let (total_news, news_list) = match field(object, fields::NEWS_LIST) {
        Some(Value::Array(items)) => {
            let mut seen_ids = HashSet::new();
            let outcomes = items
                .iter()
                .map(|item| parse_news_item(item, &mut seen_ids))
                .collect::<Vec<_>>();
            (items.len(), collect_outcomes("news item", outcomes))
        }
        _ => {
            tracing::warn!("No news list found in response data");
            (0, Vec::new())
        }
    };

    tracing::info!("Parsed {} news items successfully", news_list.len());

    Ok(NewsList {
        topic: topic.to_string(),
        extraction_timestamp: extraction_timestamp(),
        total_news,
        news_list,
        news_ids: id_echo(object),
    })
}

/// Echoes the upstream `newsIds` array, keeping its string entries
fn id_echo(object: &Map<String, Value>) -> Option<Vec<String>> {
    let values = field(object, fields::NEWS_ID_ECHO)?.as_array()?;

    let ids: Vec<String> = values
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();

    if ids.len() != values.len() {
        tracing::warn!(
            "Dropped {} non-string entries from newsIds",
            values.len() - ids.len()
        );
    }

    Some(ids)
}

fn parse_news_item(item: &Value, seen_ids: &mut HashSet<String>) -> ItemOutcome<NewsItem> {
    let object = match item {
        Value::Null => return ItemOutcome::Skipped,
        Value::Object(map) if map.is_empty() => return ItemOutcome::Skipped,
        Value::Object(map) => map,
        other => return ItemOutcome::errored(format!("expected an object, got {}", other)),
    };

    let news_id = string_field(object, fields::NEWS_ID).trim().to_string();
    if news_id.is_empty() {
        return ItemOutcome::errored("missing article id");
    }

    if !seen_ids.insert(news_id.clone()) {
        tracing::debug!("Duplicate article id {} in news list", news_id);
        return ItemOutcome::Skipped;
    }

    ItemOutcome::Parsed(NewsItem {
        news_id,
        title: clean_text(&string_field(object, fields::NEWS_TITLE)),
        provider_name: string_field(object, fields::NEWS_PROVIDER),
        byline: string_field(object, fields::NEWS_BYLINE),
        published_date: string_field(object, fields::NEWS_DATE),
        summary: clean_text(&string_field(object, fields::NEWS_SUMMARY)),
        keywords: keyword_labels(object),
        category: string_field(object, fields::NEWS_CATEGORY),
        url: string_field(object, fields::NEWS_URL),
    })
}

/// Flattens the keyword-object array into its labels
fn keyword_labels(object: &Map<String, Value>) -> Vec<String> {
    let Some(Value::Array(entries)) = field(object, fields::NEWS_KEYWORDS) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| string_field(entry, fields::NEWS_KEYWORD_LABEL))
        .filter(|label| !label.is_empty())
        .collect()
}
