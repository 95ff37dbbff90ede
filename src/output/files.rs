//! JSON and text file writers/readers

use crate::output::error::{OutputError, OutputResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Writes a value as pretty-printed UTF-8 JSON, creating parent directories
pub fn save_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    save_text_file(path, &json)
}

/// Writes text content, creating parent directories
pub fn save_text_file(path: &Path, content: &str) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))?;
    }

    fs::write(path, content).map_err(|e| OutputError::io(path, e))
}

/// Reads a JSON file into `T`
///
/// # Errors
///
/// * `OutputError::NotFound` - the file does not exist
/// * `OutputError::Validation` - the content does not decode into `T`
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> OutputResult<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(OutputError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(OutputError::io(path, e)),
    };

    serde_json::from_str(&content).map_err(|e| OutputError::Validation {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
