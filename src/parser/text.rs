//! Text cleanup shared by all normalizers

use std::collections::HashSet;

/// Collapses every run of whitespace to a single space and trims the ends
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes HTML entities (`&amp;`, `&quot;`, `&#39;`, ...)
pub fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Splits a delimited list, trimming entries and dropping empty ones
pub fn split_list(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Removes repeated entries, keeping the first occurrence of each
pub(crate) fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
