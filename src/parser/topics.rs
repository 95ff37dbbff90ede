//! Topic page normalizer
//!
//! The topic page arrives either as the site's HTML front page or as the JSON
//! body of its issue API. [`parse_topic_list`] sniffs the first non-whitespace
//! character and routes to the matching parser.

use crate::model::{extraction_timestamp, Topic, TopicList, TopicListMetadata};
use crate::parser::fields::{self, field, rank_value, string_field};
use crate::parser::text::{clean_text, dedup_preserving_order, split_list, unescape_html};
use crate::parser::{collect_outcomes, ItemOutcome, ParseError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

/// JSON topic items keep at most this many keywords
const MAX_JSON_KEYWORDS: usize = 10;

/// Unit suffix on the HTML news-count label ("123건")
const COUNT_SUFFIX: &str = "건";

static TOPIC_BUTTON: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.issupop-btn").expect("valid topic button selector"));
static RANK_SPAN: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.rank").expect("valid rank selector"));
static COUNT_SPAN: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.newsNo").expect("valid count selector"));
static SUMMARY_INPUT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"input[type="hidden"]"#).expect("valid summary selector"));
static PAGE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}년\s*\d{1,2}월\s*\d{1,2}일").expect("valid date regex"));

/// Parses a topic page, detecting whether it is JSON or HTML
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` when the payload looks like JSON but does
/// not decode. HTML input never fails; malformed markup just yields fewer topics.
pub fn parse_topic_list(content: &str) -> Result<TopicList, ParseError> {
    tracing::info!("Parsing topic list...");

    if is_json_content(content) {
        tracing::info!("Detected JSON format, parsing as API response");
        parse_json_topic_list(content)
    } else {
        tracing::info!("Detected HTML format, parsing as markup");
        Ok(parse_html_topic_list(content))
    }
}

/// Returns true if the payload starts with `{` or `[` after leading whitespace
pub fn is_json_content(content: &str) -> bool {
    matches!(content.trim_start().chars().next(), Some('{') | Some('['))
}

// ===== HTML =====

/// Parses topic-button anchors out of the front page markup
pub fn parse_html_topic_list(html: &str) -> TopicList {
    let document = Html::parse_document(html);

    let metadata = TopicListMetadata {
        extraction_date: extract_page_date(&document),
        extraction_timestamp: extraction_timestamp(),
        ..TopicListMetadata::default()
    };

    let outcomes = document
        .select(&TOPIC_BUTTON)
        .enumerate()
        .map(|(index, button)| parse_topic_button(button, index as u32 + 1));
    let topics = collect_outcomes("topic button", outcomes);

    tracing::info!("Parsed {} topics from HTML", topics.len());
    TopicList::new(metadata, topics)
}

/// Finds the first "YYYY년 M월 D일" text on the page
fn extract_page_date(document: &Html) -> String {
    document
        .root_element()
        .text()
        .find_map(|text| PAGE_DATE.find(text).map(|m| clean_text(m.as_str())))
        .unwrap_or_default()
}

/// Parses one topic anchor; `position` is its 1-based index among matched anchors
fn parse_topic_button(button: ElementRef<'_>, position: u32) -> ItemOutcome<Topic> {
    let attrs = button.value();

    let topic_text = clean_text(&unescape_html(attrs.attr("data-topic").unwrap_or("")));
    if topic_text.is_empty() {
        return ItemOutcome::Skipped;
    }

    let issue_name = clean_text(&unescape_html(attrs.attr("data-issue-name").unwrap_or("")));
    let news_ids = dedup_preserving_order(split_list(attrs.attr("data-news-ids").unwrap_or(""), ','));
    let keywords = issue_name.split_whitespace().map(str::to_string).collect();

    // Rank, count and summary live next to the anchor inside its list item
    let scope = enclosing_list_item(button);

    let rank = first_text(scope, &RANK_SPAN)
        .and_then(|text| text.parse::<i64>().ok())
        .and_then(|rank| u32::try_from(rank).ok())
        .filter(|rank| *rank >= 1)
        .unwrap_or(position);

    let news_count = first_text(scope, &COUNT_SPAN)
        .and_then(|text| text.replace(COUNT_SUFFIX, "").trim().parse::<u32>().ok())
        .unwrap_or(0);

    let summary = scope
        .select(&SUMMARY_INPUT)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|value| clean_text(&unescape_html(value)))
        .unwrap_or_default();

    ItemOutcome::Parsed(Topic {
        rank,
        topic: topic_text,
        summary,
        keywords,
        news_count,
        news_ids,
        issue_name,
    })
}

/// The closest `<li>` ancestor, or the anchor itself when there is none
fn enclosing_list_item(button: ElementRef<'_>) -> ElementRef<'_> {
    button
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "li")
        .unwrap_or(button)
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

// ===== JSON =====

/// Parses the issue API response (`todayIssueTop10` plus `todayIssueCnt`)
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` if the document does not decode.
pub fn parse_json_topic_list(content: &str) -> Result<TopicList, ParseError> {
    let data: Value = serde_json::from_str(content)?;

    let Some(object) = data.as_object() else {
        tracing::warn!("Topic JSON top level is not an object; no topics extracted");
        return Ok(TopicList::new(json_metadata(None), Vec::new()));
    };

    let metadata = json_metadata(field(object, fields::TOPIC_METADATA).and_then(Value::as_object));

    let topics = match field(object, fields::TOPIC_LIST) {
        Some(Value::Array(items)) => {
            collect_outcomes("topic item", items.iter().map(parse_json_topic_item))
        }
        Some(_) => {
            tracing::warn!("'todayIssueTop10' is not a list");
            Vec::new()
        }
        None => {
            tracing::warn!("No 'todayIssueTop10' found in JSON data");
            Vec::new()
        }
    };

    tracing::info!("Parsed {} topics from JSON", topics.len());
    Ok(TopicList::new(metadata, topics))
}

fn json_metadata(issue_count: Option<&Map<String, Value>>) -> TopicListMetadata {
    let mut metadata = TopicListMetadata {
        extraction_timestamp: extraction_timestamp(),
        ..TopicListMetadata::default()
    };

    let Some(counts) = issue_count else {
        return metadata;
    };

    if let Some(Value::String(date)) = counts.get("date") {
        metadata.extraction_date = format_date_code(date).unwrap_or_default();
    }

    let echo = |key: &str| counts.get(key).filter(|v| !v.is_null()).cloned();
    metadata.news_count = echo("news_cnt");
    metadata.topic_count = echo("topic_cnt");
    metadata.analyzed_order = echo("analyzed_order");
    metadata.update_datetime = echo("update_dt");

    metadata
}

/// Reformats a `YYYYMMDD` date code as "YYYY년 MM월 DD일"
fn format_date_code(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() != 8 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(format!("{}년 {}월 {}일", &code[..4], &code[4..6], &code[6..8]))
}

fn parse_json_topic_item(item: &Value) -> ItemOutcome<Topic> {
    let object = match item {
        Value::Null => return ItemOutcome::Skipped,
        Value::Object(map) if map.is_empty() => return ItemOutcome::Skipped,
        Value::Object(map) => map,
        other => return ItemOutcome::errored(format!("expected an object, got {}", other)),
    };

    let topic_text = clean_text(&string_field(object, fields::TOPIC_LABEL));
    if topic_text.is_empty() {
        return ItemOutcome::Skipped;
    }

    let rank = field(object, fields::TOPIC_RANK)
        .and_then(rank_value)
        .unwrap_or(1);

    let mut keywords = split_list(&string_field(object, fields::TOPIC_KEYWORDS), ',');
    keywords.truncate(MAX_JSON_KEYWORDS);

    let news_ids = dedup_preserving_order(split_list(
        &string_field(object, fields::TOPIC_NEWS_IDS),
        ',',
    ));
    let news_count = match u32::try_from(news_ids.len()) {
        Ok(count) => count,
        Err(_) => return ItemOutcome::errored("news cluster too large"),
    };

    ItemOutcome::Parsed(Topic {
        rank,
        topic: topic_text,
        summary: clean_text(&string_field(object, fields::TOPIC_SUMMARY)),
        keywords,
        news_count,
        news_ids,
        issue_name: clean_text(&string_field(object, fields::TOPIC_ISSUE_NAME)),
    })
}
