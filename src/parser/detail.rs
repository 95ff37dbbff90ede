//! News-detail response normalizer

use crate::model::{detail_keys, extraction_timestamp, NewsDetail};
use crate::parser::fields::{self, field, string_field};
use crate::parser::text::clean_text;
use crate::parser::ParseError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parses one news-detail response
///
/// When the response carries no `detail` section the body is `None` and the
/// metadata map is empty.
///
/// # Errors
///
/// Returns `ParseError::UnexpectedShape` if the response is not a JSON object
/// or its `detail` value is not an object.
pub fn parse_news_detail(response: &Value) -> Result<NewsDetail, ParseError> {
    tracing::debug!("Parsing news detail from response data");

    let object = response.as_object().ok_or_else(|| {
        ParseError::UnexpectedShape("news detail response is not a JSON object".to_string())
    })?;

    let Some(detail_value) = field(object, fields::DETAIL) else {
        tracing::warn!("No detail found in response data");
        return Ok(NewsDetail {
            extraction_timestamp: extraction_timestamp(),
            news_detail: None,
            content: None,
            metadata: BTreeMap::new(),
        });
    };

    let detail = detail_value.as_object().ok_or_else(|| {
        ParseError::UnexpectedShape("'detail' is not a JSON object".to_string())
    })?;

    let metadata = [
        (detail_keys::TITLE, clean_text(&string_field(detail, fields::DETAIL_TITLE))),
        (detail_keys::PROVIDER, string_field(detail, fields::DETAIL_PROVIDER)),
        (detail_keys::BYLINE, string_field(detail, fields::DETAIL_BYLINE)),
        (detail_keys::PUBLISHED_DATE, string_field(detail, fields::DETAIL_DATE)),
        (detail_keys::CATEGORY, string_field(detail, fields::DETAIL_CATEGORY)),
        (detail_keys::KEYWORDS, string_field(detail, fields::DETAIL_KEYWORDS)),
        (detail_keys::SUMMARY, clean_text(&string_field(detail, fields::DETAIL_SUMMARY))),
        (detail_keys::URL, string_field(detail, fields::DETAIL_URL)),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();

    Ok(NewsDetail {
        extraction_timestamp: extraction_timestamp(),
        news_detail: Some(detail_value.clone()),
        content: Some(clean_text(&string_field(detail, fields::DETAIL_CONTENT))),
        metadata,
    })
}
