//! Label dictionary loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::warn;

use crate::error::ConfigError;

/// Reads a newline-delimited label file: one label per line, whitespace
/// trimmed, blank lines dropped, file order preserved.
///
/// Labels end up in output filenames, so anything outside `[A-Za-z0-9._-]`
/// gets a warning here rather than a surprise at write time.
pub fn load_dictionary(path: &Path) -> Result<Vec<String>, ConfigError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::DictionaryNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::DictionaryIo { path: path.to_path_buf(), source: e });
        }
    };

    let text = String::from_utf8(bytes)
        .map_err(|_| ConfigError::DictionaryEncoding(path.to_path_buf()))?;

    let labels: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();

    for label in &labels {
        if !filename_safe(label) {
            warn!("label {label:?} contains characters unsafe for filenames");
        }
    }

    Ok(labels)
}

fn filename_safe(label: &str) -> bool {
    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
