//! Folder layout for crawl output

use crate::config::OutputConfig;
use crate::output::error::{OutputError, OutputResult};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TOPIC_LIST_HTML: &str = "topic-list.html";
pub const TOPIC_LIST_JSON: &str = "topic-list.json";
pub const NEWS_LIST_JSON: &str = "news-list.json";
pub const NEWS_DIR: &str = "news";

/// Resolves and creates the run's output location
///
/// With `create_timestamp_folder` set, the run is nested under a fresh
/// filesystem-safe timestamp folder inside `output_dir`.
pub fn create_output_folder(config: &OutputConfig) -> OutputResult<PathBuf> {
    let path = if config.create_timestamp_folder {
        config.output_dir.join(timestamp_folder_name())
    } else {
        config.output_dir.clone()
    };

    fs::create_dir_all(&path).map_err(|e| OutputError::io(&path, e))?;
    Ok(path)
}

/// Current local time as ISO-8601 with `:` and `.` replaced by `-`
pub fn timestamp_folder_name() -> String {
    Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
        .replace([':', '.'], "-")
}

pub fn topic_page_file(base: &Path) -> PathBuf {
    base.join(TOPIC_LIST_HTML)
}

pub fn topic_list_file(base: &Path) -> PathBuf {
    base.join(TOPIC_LIST_JSON)
}

/// `<base>/topic-<NN>` with the rank zero-padded to two digits
pub fn topic_folder(base: &Path, rank: u32) -> PathBuf {
    base.join(format!("topic-{:02}", rank))
}

pub fn news_list_file(topic_folder: &Path) -> PathBuf {
    topic_folder.join(NEWS_LIST_JSON)
}

pub fn news_folder(topic_folder: &Path) -> PathBuf {
    topic_folder.join(NEWS_DIR)
}

/// `<news_dir>/<news_id>.json`; path separators in the ID become `_`
pub fn detail_file(news_dir: &Path, news_id: &str) -> PathBuf {
    let file_stem = news_id.replace(['/', '\\'], "_");
    news_dir.join(format!("{}.json", file_stem))
}

/// Returns the lexicographically last sub-directory of `base`
///
/// Timestamp folders sort chronologically, so this is the most recent run.
/// Returns `None` if `base` is missing or has no sub-directories.
pub fn latest_output_folder(base: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(base).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
}

/// Formats an elapsed duration as `1.234s`, `2m 5.0s` or `1h 2m 3.0s`
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();

    if seconds < 60.0 {
        format!("{:.3}s", seconds)
    } else if seconds < 3600.0 {
        let minutes = (seconds / 60.0).floor();
        format!("{}m {:.1}s", minutes as u64, seconds - minutes * 60.0)
    } else {
        let hours = (seconds / 3600.0).floor();
        let minutes = ((seconds - hours * 3600.0) / 60.0).floor();
        let secs = seconds - hours * 3600.0 - minutes * 60.0;
        format!("{}h {}m {:.1}s", hours as u64, minutes as u64, secs)
    }
}
