//! Output sink for crawl results
//!
//! This module handles:
//! - Resolving the deterministic folder layout for each stage
//! - Writing JSON checkpoints and raw HTML
//! - Reading checkpoints back for later stages
//!
//! ```text
//! <output_dir>/[<timestamp>/]
//!   topic-list.html
//!   topic-list.json
//!   topic-<NN>/
//!     news-list.json
//!     news/
//!       <news_id>.json
//! ```

mod error;
mod files;
mod layout;

pub use error::{OutputError, OutputResult};
pub use files::{load_json_file, save_json_file, save_text_file};
pub use layout::{
    create_output_folder, detail_file, format_duration, latest_output_folder, news_folder,
    news_list_file, timestamp_folder_name, topic_folder, topic_list_file, topic_page_file,
    NEWS_DIR, NEWS_LIST_JSON, TOPIC_LIST_HTML, TOPIC_LIST_JSON,
};
